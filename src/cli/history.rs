use tabled::Table;

use crate::{
    analyzer::AnalysisApi,
    cli::{client, spinner},
    error, info, utils,
};

pub async fn history() {
    let client = client();

    let pb = spinner("Fetching past analyses...");
    let analyses = client.analyses().await;
    pb.finish_and_clear();

    match analyses {
        Ok(analyses) if analyses.is_empty() => info!("No analyses yet."),
        Ok(analyses) => {
            let table = Table::new(utils::history_rows(analyses));
            println!("{}", table);
        }
        Err(e) => error!("Failed to load analysis history: {}", e.user_message()),
    }
}
