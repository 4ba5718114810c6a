use std::sync::Arc;

use handlebars::Handlebars;

use consulta_service::{Category, QdrantCollection, Service};
use consulta_storage::{lexical::LexicalIndex, qdrant::QdrantStore};

use crate::page;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<Service>,
	pub pages: Arc<Handlebars<'static>>,
}
impl AppState {
	pub async fn new(config: consulta_config::Config) -> color_eyre::Result<Self> {
		let store = Arc::new(QdrantStore::new(&config.storage.qdrant)?);
		let mut categories = Vec::with_capacity(config.categories.len());

		for category in &config.categories {
			let lexical = LexicalIndex::connect(&category.lexical_db_path).await?;

			tracing::info!(
				category = %category.name,
				lexical_db = %category.lexical_db_path,
				collection = %category.collection,
				"Category indexes attached."
			);

			categories.push(Category {
				name: category.name.clone(),
				lexical: Arc::new(lexical),
				semantic: Arc::new(QdrantCollection::new(
					store.clone(),
					category.collection.clone(),
				)),
			});
		}

		let service = Service::new(config, categories);

		Self::from_service(Arc::new(service))
	}

	pub fn from_service(service: Arc<Service>) -> color_eyre::Result<Self> {
		let mut pages = Handlebars::new();

		pages.register_template_string("consulta", page::CONSULTA_PAGE)?;

		Ok(Self { service, pages: Arc::new(pages) })
	}
}
