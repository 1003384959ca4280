use clap::Parser;
use directory_search::llm::{OpenRouterResolver, ParameterResolver};
use directory_search::{present, repl};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging; progress messages are shown unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    let builder = match args.search() {
        Ok(builder) => builder,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            return;
        }
    };
    let config = builder.config().clone();
    let mut search = match builder.build() {
        Ok(search) => search,
        Err(e) => {
            ::log::error!("Failed to set up search: {}", e);
            return;
        }
    };

    // The credential is looked up once here and handed to the resolver
    let api_key = std::env::var(&config.llm.api_key_env).ok();
    let resolver = OpenRouterResolver::new(config.llm.clone(), api_key, config.request_timeout());
    let format = args.output_format();

    if args.interactive {
        if let Err(e) = repl::run(&mut search, &resolver, format).await {
            ::log::error!("Prompt failed: {}", e);
        }
        return;
    }

    let natural = args.natural();
    let request = match natural {
        Some(text) => {
            let request = resolver.resolve(text).await;
            println!("Parsed from natural language: {}", request);
            request
        }
        None => args.request(),
    };

    if natural.is_some() || !request.is_empty() {
        let results = search.perform_search(&request, config.max_pages).await;
        present::print(&results, format);
    } else {
        print_usage_hint();
    }
}

fn print_usage_hint() {
    println!("No search parameters provided. Use --help for usage information.");
    println!();
    println!("Example commands:");
    println!("directory-search --state Kansas --member 'Dwight Elmore'");
    println!("directory-search --natural 'Find members in Kansas with American Red breed'");
    println!("directory-search --interactive");
}
