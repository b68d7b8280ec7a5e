use clap::Parser;
use kisoku::data::ExecutionContext;
use rand::{Rng, rngs::ThreadRng};
use serde_json::{Value, json};
use std::fs;

/// A CLI tool to generate sample execution contexts for kisoku rules
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_context.json")]
    output: String,

    /// The minimum number of sales to generate
    #[arg(long, default_value_t = 0)]
    min: usize,

    /// The maximum number of sales to generate
    #[arg(long, default_value_t = 40)]
    max: usize,

    /// Number of sales representatives on the team
    #[arg(long, default_value_t = 5)]
    team: usize,
}

const REGIONS: &[&str] = &["north", "south", "east", "west"];
const STATUSES: &[&str] = &["open", "closed", "cancelled"];
const ROLES: &[&str] = &["rep", "senior", "manager"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }
    let team = cli.team.max(1);

    println!(
        "Generating a new context (sales: {} to {}, team of {})...",
        cli.min, cli.max, team
    );

    let products: Vec<Value> = (1..=12).map(|id| generate_product(&mut rng, id)).collect();
    let count = rng.random_range(cli.min..=cli.max);
    let all_sales: Vec<Value> = (1..=count)
        .map(|id| generate_sale(&mut rng, id, team))
        .collect();
    println!("-> Generated {} sale(s).", all_sales.len());

    let user_id: usize = 1;
    let user_sales: Vec<Value> = all_sales
        .iter()
        .filter(|sale| sale["CreatedBy"] == json!(user_id))
        .cloned()
        .collect();
    let team_members: Vec<Value> = (1..=team)
        .map(|id| generate_member(&mut rng, id, &all_sales))
        .collect();

    let sale = user_sales
        .first()
        .cloned()
        .unwrap_or_else(|| generate_sale(&mut rng, count + 1, 1));

    let context = ExecutionContext::from(json!({
        "sale": sale,
        "user": {
            "Id": user_id,
            "Name": "Rep 1",
            "Role": ROLES[rng.random_range(0..ROLES.len())],
            "Department": "Sales",
            "ManagerId": 0,
            "TeamId": 1,
            "HireDate": format!("20{:02}-{:02}-01", rng.random_range(15..24), rng.random_range(1..=12)),
            "Level": rng.random_range(1..=5),
            "Target": 50_000,
        },
        "context": {
            "Target": 50_000,
            "Period": "2024-Q4",
            "Year": 2024,
            "Quarter": 4,
            "Month": 11,
            "CommissionRate": 0.05,
            "BonusPool": 20_000,
            "Today": "2024-11-15",
        },
        "customer": {
            "Id": rng.random_range(1..=500),
            "Name": "Customer",
            "Segment": "enterprise",
            "Region": REGIONS[rng.random_range(0..REGIONS.len())],
            "IsNew": rng.random_bool(0.3),
            "SignupDate": "2024-01-10",
        },
        "allSales": all_sales,
        "userSales": user_sales,
        "teamMembers": team_members,
        "products": products,
    }));

    let json_output = serde_json::to_string_pretty(&context)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved the context to '{}'",
        cli.output
    );

    Ok(())
}

fn generate_sale(rng: &mut ThreadRng, id: usize, team: usize) -> Value {
    let amount: f64 = rng.random_range(100.0..15_000.0);
    json!({
        "Id": id,
        "Amount": amount.round(),
        "SaleAmount": amount.round(),
        "Quantity": rng.random_range(1..=20),
        "ProductId": rng.random_range(1..=12),
        "CategoryId": rng.random_range(1..=5),
        "CustomerId": rng.random_range(1..=500),
        "CreatedBy": rng.random_range(1..=team),
        "CreatedDate": format!("2024-{:02}-{:02}", rng.random_range(1..=12), rng.random_range(1..=28)),
        "Region": REGIONS[rng.random_range(0..REGIONS.len())],
        "Status": STATUSES[rng.random_range(0..STATUSES.len())],
        "Discount": (rng.random_range(0.0..0.3_f64) * 100.0).round() / 100.0,
        "Margin": (rng.random_range(0.05..0.6_f64) * 100.0).round() / 100.0,
    })
}

fn generate_member(rng: &mut ThreadRng, id: usize, sales: &[Value]) -> Value {
    let achieved: f64 = sales
        .iter()
        .filter(|sale| sale["CreatedBy"] == json!(id))
        .filter_map(|sale| sale["SaleAmount"].as_f64())
        .sum();
    json!({
        "Id": id,
        "Name": format!("Rep {}", id),
        "Role": ROLES[rng.random_range(0..ROLES.len())],
        "Target": rng.random_range(20..80) * 1_000,
        "Achieved": achieved,
    })
}

fn generate_product(rng: &mut ThreadRng, id: usize) -> Value {
    json!({
        "Id": id,
        "Name": format!("Product {}", id),
        "Category": rng.random_range(1..=5),
        "Price": rng.random_range(50..2_000),
        "Margin": (rng.random_range(0.05..0.6_f64) * 100.0).round() / 100.0,
        "IsPromoted": rng.random_bool(0.25),
    })
}
