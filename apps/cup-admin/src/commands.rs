//! Command handlers. Each returns the JSON document printed to stdout.

use cup_core::{calculate_discount_percentage, validation, Customer};
use cup_db::Database;
use cup_order::OrderCreationService;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::cli::Command;
use crate::error::{AdminError, AdminResult};

pub async fn execute(command: Command, db: &Database) -> AdminResult<Value> {
    match command {
        Command::Order {
            customer_id,
            membership,
            cups,
        } => {
            let service =
                OrderCreationService::new(Arc::new(db.orders()), Arc::new(db.coffee_cups()));
            let customer = Customer::new(customer_id, membership);

            let result = service.create_order(Some(&customer), cups).await?;
            Ok(serde_json::to_value(&result)?)
        }

        Command::Quote { membership, cups } => {
            validation::validate_number_of_ordered_cups(cups)?;
            let discount = calculate_discount_percentage(membership, cups);

            Ok(json!({
                "membership": membership,
                "number_of_ordered_cups": cups,
                "discount_percent": discount,
            }))
        }

        Command::Stock => {
            let in_stock = db.coffee_cups().count_in_stock().await?;
            Ok(json!({ "cups_in_stock": in_stock }))
        }

        Command::Restock { count } => {
            let added = db.coffee_cups().add_coffee_cups(count).await?;
            let in_stock = db.coffee_cups().count_in_stock().await?;
            Ok(json!({ "added": added.len(), "cups_in_stock": in_stock }))
        }

        Command::InitConfig | Command::Help => Err(AdminError::usage(
            "command does not use the database",
        )),
    }
}

/// Stocks `initial_cups` when the database has never held a cup.
///
/// Returns the number of cups added.
pub async fn seed_stock(db: &Database, initial_cups: u32) -> AdminResult<u32> {
    if initial_cups == 0 {
        return Ok(0);
    }

    let cups = db.coffee_cups();
    let untouched = cups.count_all().await? == 0 && db.orders().count().await? == 0;
    if !untouched {
        return Ok(0);
    }

    cups.add_coffee_cups(initial_cups).await?;
    info!(initial_cups, "Seeded initial stock");
    Ok(initial_cups)
}
