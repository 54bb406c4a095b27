//! relalg CLI - evaluate relational algebra expressions from the shell

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use relalg::catalog::{Catalog, StoredRelation};
use relalg::engine::Engine;
use relalg::evaluator::ast_to_pipeline;
use relalg::parser::parse_expression;
use relalg::relation::Relation;
use std::path::PathBuf;

/// Evaluate a relational algebra expression against a relation catalog
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Expression in unicode or ASCII notation,
    /// e.g. 'pi(EmpID, sigma(Salary > 3000, Employee))'
    expression: String,

    /// JSON file with relations replacing the seed catalog
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Print the equivalent SQL only
    #[arg(short, long)]
    sql: bool,

    /// Print the lowered pipeline as JSON instead of evaluating
    #[arg(short, long)]
    pipeline: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let catalog = match &args.catalog {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
            let relations: Vec<StoredRelation> =
                serde_json::from_str(&data).context("Failed to parse catalog JSON")?;
            let mut catalog = Catalog::new();
            for relation in relations {
                catalog.insert(relation);
            }
            catalog
        }
        None => Catalog::seed(),
    };

    if args.pipeline {
        let ast = parse_expression(&args.expression)?;
        let nodes = ast_to_pipeline(&ast);
        println!("{}", serde_json::to_string_pretty(&nodes)?);
        return Ok(());
    }

    let mut engine = Engine::new(catalog);
    let evaluation = engine.run_expression(&args.expression)?;

    if args.sql {
        println!("{}", evaluation.sql);
        return Ok(());
    }

    print_table(&evaluation.relation);
    println!();
    println!("SQL: {}", evaluation.sql);
    Ok(())
}

/// Render a relation as an aligned text table
fn print_table(relation: &Relation) {
    let headers: Vec<String> = relation
        .schema
        .iter()
        .map(|column| format!("{} ({})", column.name, column.data_type))
        .collect();
    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    let rendered: Vec<Vec<String>> = relation
        .rows
        .iter()
        .map(|row| row.iter().map(|value| value.render()).collect())
        .collect();
    for row in &rendered {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.len());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(index, cell)| format!("{:<width$}", cell, width = widths[index]))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", relation.name);
    println!("{}", line(&headers));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 3 * (widths.len().saturating_sub(1))));
    for row in &rendered {
        println!("{}", line(row));
    }
    println!("({} rows)", relation.rows.len());
}
