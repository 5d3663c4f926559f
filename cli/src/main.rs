//! Demo runner: builds a small ledger, schedules a day of transactions,
//! runs the engine, and prints a JSON summary of the run.

use ledger_sim_core::{AccountKind, ChartOfAccounts, Engine, Transaction};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut chart = ChartOfAccounts::new();
    let cash = chart.create_asset_account("Cash", 500_000).clone();
    let sales = chart.create_income_account("Sales", 0).clone();
    let rent = chart.create_expense_account("Rent", 0).clone();
    let loan = chart.create_liability_account("Bank Loan", 200_000).clone();

    let mut engine = Engine::new("ledger-demo", chart);

    let mut sale = Transaction::new(1, "Cash sale");
    sale.add_debit(&cash, 125_000);
    sale.add_credit(&sales, 125_000);
    engine.schedule(Box::new(sale));

    let mut rent_payment = Transaction::new(2, "Office rent");
    rent_payment.add_debit(&rent, 80_000);
    rent_payment.add_credit(&cash, 80_000);
    engine.schedule(Box::new(rent_payment));

    let mut repayment = Transaction::new(3, "Loan repayment");
    repayment.add_debit(&loan, 50_000);
    repayment.add_credit(&cash, 50_000);
    engine.schedule(Box::new(repayment));

    engine.run(None)?;

    let mut balances = serde_json::Map::new();
    for kind in AccountKind::ALL {
        for account in engine.context().by_kind(kind) {
            balances.insert(account.name().to_string(), json!(account.balance()));
        }
    }

    let summary = json!({
        "engine": engine.name(),
        "state": engine.state(),
        "message": engine.message(),
        "now": engine.now(),
        "dispatched": engine.dispatch_log().len(),
        "balances": balances,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
