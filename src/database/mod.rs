use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        // Timeouts
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("adchain");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the services rely on. The unique email index is
    /// load-bearing: it is what turns a signup race into an E11000 conflict.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.database().collection::<mongodb::bson::Document>("users");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let user_id_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .build();

        match users.create_index(user_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(userId)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let ads = self.database().collection::<mongodb::bson::Document>("ads");

        // Open-feed queries filter by status and category
        let feed_index = IndexModel::builder()
            .keys(doc! { "status": 1, "category": 1 })
            .build();

        match ads.create_index(feed_index).await {
            Ok(_) => log::info!("   ✅ Index created: ads(status, category)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let company_index = IndexModel::builder()
            .keys(doc! { "companyId": 1 })
            .build();

        match ads.create_index(company_index).await {
            Ok(_) => log::info!("   ✅ Index created: ads(companyId)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let accepted_index = IndexModel::builder()
            .keys(doc! { "acceptedBy": 1 })
            .build();

        match ads.create_index(accepted_index).await {
            Ok(_) => log::info!("   ✅ Index created: ads(acceptedBy)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
