use log::info;
use mongodb::{options::ClientOptions, Client, Database};

pub struct MongoDB {
    pub client: Client,
    pub db: Database,
}

impl MongoDB {
    pub async fn init(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(uri).await?;
        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);
        info!("MongoDB client ready for database {}", db_name);
        Ok(MongoDB { client, db })
    }
}
