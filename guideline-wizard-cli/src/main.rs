use clap::Parser;
use guideline_wizard_core::{execute_guideline_flow, style, GuidelineCliArgs};

fn main() {
    let cli_args = GuidelineCliArgs::parse();
    match execute_guideline_flow(cli_args) {
        Ok(outcome) => {
            if !outcome.changes_from_previous.is_empty() {
                println!("\n{}", style("changes from previous guidelines:").cyan().bold());
                for change in &outcome.changes_from_previous {
                    println!("{}", style(format!("  - {change}")).yellow());
                }
            }
        }
        Err(e) => {
            eprintln!(
                "{} {} {}",
                style("❌"),
                style("guideline-wizard failed:").red().bold(),
                style(&e).red()
            );
            std::process::exit(1);
        }
    }
}
