//! Support desk demo driver.
//!
//! Seeds a couple of demo customers and routes three sample tickets
//! through the pipeline, logging the chosen agent route and printing
//! the composed replies.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, Level};

use deskd::{CompletionClient, DeskConfig, SqliteStore, SupportDesk};
use desk_common::CustomerRecord;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("deskd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = DeskConfig::load()?;

    let store = Arc::new(SqliteStore::open(&config.database.path).await?);
    seed_demo_customers(&store).await?;

    let mut llm = CompletionClient::new(&config.llm.endpoint, &config.llm.model);
    if let Some(key) = &config.llm.api_key {
        llm = llm.with_api_key(key);
    }

    let desk = SupportDesk::new(Arc::new(llm), store);

    for (label, ticket, customer_id) in demo_tickets() {
        info!("--- {} ---", label);
        let result = desk.process_ticket(ticket, customer_id).await;

        println!("\n=== {label} ===");
        println!("Route: {}", result.route_display());
        println!("{}\n", result.final_reply);
    }

    Ok(())
}

async fn seed_demo_customers(store: &SqliteStore) -> Result<()> {
    store
        .upsert_customer(
            "CUST001",
            &CustomerRecord {
                name: "Sarah Meier".to_string(),
                email: Some("sarah.meier@example.com".to_string()),
                plan: Some("Premium".to_string()),
                join_date: Some("2023-04-12".to_string()),
                last_payment: Some("2024-09-01".to_string()),
                support_history: None,
                ..Default::default()
            },
        )
        .await?;

    store
        .upsert_customer(
            "CUST002",
            &CustomerRecord {
                name: "Mike Chen".to_string(),
                email: Some("mike.chen@techcorp.example".to_string()),
                plan: Some("Business".to_string()),
                join_date: Some("2022-01-30".to_string()),
                last_payment: Some("2024-09-15".to_string()),
                support_history: Some(vec![
                    "2024-03-02: API key rotation".to_string(),
                    "2024-06-18: webhook outage follow-up".to_string(),
                ]),
                ..Default::default()
            },
        )
        .await?;

    info!("Demo customers seeded");
    Ok(())
}

fn demo_tickets() -> Vec<(&'static str, &'static str, Option<&'static str>)> {
    vec![
        (
            "Billing inquiry",
            "Subject: Frage zu meiner letzten Rechnung\n\
             Customer ID: CUST001\n\n\
             Hallo, ich habe meine Rechnung fuer September erhalten, aber ich bin verwirrt \
             ueber einige Gebuehren. Koennen Sie mir bitte erklaeren, wofuer die \
             \"Premium Features\" Gebuehr ist? Ich kann mich nicht daran erinnern, \
             Premium-Features zu meinem Konto hinzugefuegt zu haben.\n\n\
             Vielen Dank,\nSarah",
            None,
        ),
        (
            "Technical problem",
            "Subject: DRINGEND - API antwortet nicht\n\
             Customer: CUST002\n\n\
             Unsere Produktionsanwendung erhaelt seit etwa 2 Stunden 500-Fehler von Ihrer API. \
             Das betrifft unsere Kunden und wir brauchen sofortige Hilfe!\n\n\
             Fehlermeldung: \"Connection timeout after 30 seconds\"\n\
             Endpoint: /api/v2/data/sync\n\n\
             Wir haben den Business-Plan und das ist kritisch fuer unseren Betrieb.\n\n\
             Mike Chen\nCTO, TechCorp",
            Some("CUST002"),
        ),
        (
            "General inquiry",
            "Subject: Frage zu Ihrem Service\n\n\
             Hallo,\n\
             ich ueberlege, mich fuer Ihren Service anzumelden und wollte wissen, was im \
             Basic-Plan im Vergleich zum Premium-Plan enthalten ist? Bieten Sie auch \
             Studentenrabatte an?\n\n\
             Vielen Dank!\nAlex",
            None,
        ),
    ]
}
