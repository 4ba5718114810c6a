use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = consulta_api::Args::parse();
	consulta_api::run(args).await
}
