//! Order commands.

use storekeeper_core::OrderId;
use storekeeper_merchant::orders::{OrderAction, OrderError, OrderView, OrderWorkflow};

use super::Context;
use crate::platform::SystemDialer;

/// Fetch, enrich, and print the order list.
pub async fn list(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.require_session()?;
    let mut workflow = OrderWorkflow::new(ctx.api.clone(), session.store_id().clone());

    let orders = workflow.refresh().await?;
    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }

    for order in orders {
        print_order(order);
    }
    Ok(())
}

/// Apply a status transition, then print the reloaded list.
pub async fn transition(
    ctx: &Context,
    id: &str,
    action: OrderAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.require_session()?;
    let mut workflow = OrderWorkflow::new(ctx.api.clone(), session.store_id().clone());
    workflow.refresh().await?;

    let order_id = OrderId::new(id);
    match workflow.apply(&order_id, action).await {
        Ok(orders) => {
            println!("Order {id} updated.");
            for order in orders {
                print_order(order);
            }
            Ok(())
        }
        Err(OrderError::Transition(e)) => {
            println!("{e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Call the customer behind an order.
pub async fn call(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.require_session()?;
    let mut workflow = OrderWorkflow::new(ctx.api.clone(), session.store_id().clone());
    workflow.refresh().await?;

    match workflow.call_customer(&OrderId::new(id), &SystemDialer) {
        Ok(()) => println!("Calling the customer for order {id}..."),
        // Informational: nothing to dial, nothing happened
        Err(OrderError::NoPhoneNumber) => println!("No phone number on file for this customer."),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn print_order(order: &OrderView) {
    println!(
        "Order #{}  [{}]  {}",
        order.id,
        order.status,
        order.created_at.format("%b %e, %Y")
    );
    if let Some(username) = &order.customer_username {
        println!("  customer: {username}");
    }
    for line in &order.lines {
        println!("  {} x {}  ({})", line.name, line.quantity, line.line_total());
    }
    println!("  total: {}", order.total);
}
