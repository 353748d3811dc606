use report_compare::config::Config;
use report_compare::limit::RowLimit;
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("crates/report-compare/viewer.toml")
    };

    println!("Validating config file: {}", config_path.display());

    let config = Config::from_file(&config_path)?;

    println!("\n✓ Successfully parsed configuration!");

    println!("\nReport:");
    match &config.report.path {
        Some(path) => println!("  Path: {}", path.display()),
        None => println!("  Path: (from command line)"),
    }
    println!("  Delimiter: {:?}", config.report.delimiter);

    let view = config.view_config();
    println!("\nView:");
    println!("  Baseline: {}", view.baseline);
    println!(
        "  Sort metric: {}",
        view.sort_metric.as_deref().unwrap_or("(first metric)")
    );

    let (limit, warning) = RowLimit::parse_lenient(view.row_limit.as_deref().unwrap_or(""));
    println!("  Row limit: {}", limit);
    if let Some(warning) = warning {
        println!("  ⚠ {}", warning);
    }

    println!("\nOutput:");
    println!("  Format: {}", config.output.format);
    if let Some(path) = &config.output.path {
        println!("  Path: {}", path.display());
    }

    println!("\n✓ All validations passed!");

    Ok(())
}
