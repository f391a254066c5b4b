// src/cli/report.rs
use super::{CliResult, ReportKind};
use crate::reports::{self, GroupTotal};
use crate::store::Store;

fn amount(v: Option<f64>) -> String {
    v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn print_totals(group_by: &str, totals: &[GroupTotal]) {
    let Some(first) = totals.first() else {
        println!("No rows");
        return;
    };
    let mut header = format!("{:<16} {:>6}", group_by, "rows");
    for (col, _) in &first.sums {
        header.push_str(&format!(" {:>14}", col));
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));
    for t in totals {
        let mut line = format!("{:<16} {:>6}", t.group, t.rows);
        for (_, sum) in &t.sums {
            line.push_str(&format!(" {:>14.2}", sum));
        }
        println!("{}", line);
    }
}

pub fn run(store: &Store, kind: ReportKind, group_by: Option<&str>) -> CliResult {
    match kind {
        ReportKind::Overview => {
            let o = reports::overview(store)?;
            for (table, count) in &o.row_counts {
                println!("{:<12} {}", table, count);
            }
            println!("Receipts value: {:.2}", o.receipts_value);
            println!("Sales value:    {:.2}", o.sales_value);
            println!("Cost ratio:     {}%", amount(o.cost_ratio));
        }
        ReportKind::Recipes => {
            let summary = reports::recipe_summary(store)?;
            println!(
                "{} recipes, cost % avg {} min {} max {}",
                summary.count,
                amount(summary.average_cost_percentage),
                amount(summary.min_cost_percentage),
                amount(summary.max_cost_percentage)
            );
            println!("{:<10} {:<24} {:>10} {:>10} {:>8}  {}", "Code", "Name", "Price", "Cost", "Cost %", "Updated");
            for r in reports::recipe_overview(store)? {
                println!(
                    "{:<10} {:<24} {:>10} {:>10} {:>8}  {}",
                    r.item_code.as_deref().unwrap_or(""),
                    r.item_name.as_deref().unwrap_or(""),
                    amount(r.selling_price),
                    amount(r.cost_price),
                    amount(r.cost_percentage),
                    r.last_updated.as_deref().unwrap_or("")
                );
            }
        }
        ReportKind::Receipts => {
            let group_by = group_by.unwrap_or("month");
            print_totals(group_by, &reports::receipt_totals(store, group_by)?);
        }
        ReportKind::Sales => {
            let group_by = group_by.unwrap_or("date");
            print_totals(group_by, &reports::sales_totals(store, group_by)?);
        }
    }
    Ok(())
}
