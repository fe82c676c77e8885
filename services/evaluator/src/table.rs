use clap::Args;
use nvi_points::error::AppError;
use nvi_points::evaluation::{base_points_table, BasePointsEntry};

#[derive(Args, Debug, Default)]
pub(crate) struct TableArgs {
    /// Emit the table as JSON instead of aligned text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_table(args: TableArgs) -> Result<(), AppError> {
    let entries = base_points_table();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", render_table(&entries));
    }
    Ok(())
}

fn render_table(entries: &[BasePointsEntry]) -> String {
    let mut output = format!(
        "{:<26} {:<10} {:<9} {:>6}\n",
        "Instance type", "Channel", "Level", "Points"
    );
    for entry in entries {
        output.push_str(&format!(
            "{:<26} {:<10} {:<9} {:>6}\n",
            entry.instance_type.label(),
            entry.channel_type.label(),
            entry.scientific_value.label(),
            entry.points.to_string()
        ));
    }
    output
}
