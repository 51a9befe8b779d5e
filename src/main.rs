use log::{error, warn};
use std::env;
use std::io::Read;

use simplicook::{
    catalog_from_config, generator_from_config, open_store, parse_completion, AppConfig,
    GenerationRequest, RecipeId, RecipeIdGenerator, RecipeSummary,
};

const USAGE: &str = "Usage: simplicook <command>

Commands:
  generate <INGREDIENTS> [--cuisine C] [--diet D] [--save]
  parse [FILE]              Parse a completion (stdin when FILE is omitted)
  saved                     List saved recipes
  favorite <ID>             Toggle the favorite flag of a saved recipe
  trending                  List trending recipes
  search <QUERY>            Search the recipe catalog
  category <NAME>           List recipes in a category";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().ok_or(USAGE)?;
    let rest = &args[1..];
    let config = AppConfig::load()?;

    match command.as_str() {
        "generate" => {
            let (request, save) = parse_generate_args(rest)?;
            let mut store = open_store(&config);
            let generator = generator_from_config(&config, store.max_id())?;

            let recipe = generator.generate(&request).await?;
            println!("[{}] {}", recipe.id, recipe.to_text());

            if save {
                match generator.save_generated(&mut store) {
                    Ok(_) => println!("Saved recipe {}", recipe.id),
                    Err(e) => warn!("Recipe kept for this session only: {}", e),
                }
            }
        }
        "parse" => {
            let text = match rest.first() {
                Some(path) => tokio::fs::read_to_string(path).await?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let recipe = parse_completion(&text).into_recipe(RecipeIdGenerator::new().next_id());
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        "saved" => {
            let store = open_store(&config);
            if store.is_empty() {
                println!("No saved recipes yet.");
            }
            for recipe in store.recipes() {
                let heart = if recipe.is_favorite { "*" } else { " " };
                println!("{} [{}] {}", heart, recipe.id, recipe.title);
            }
        }
        "favorite" => {
            let id: RecipeId = rest.first().ok_or(USAGE)?.parse()?;
            let mut store = open_store(&config);
            if !store.toggle_favorite(id)? {
                error!("No saved recipe with id {}", id);
                return Err(format!("No saved recipe with id {}", id).into());
            }
            if let Some(recipe) = store.get(id) {
                println!("{} favorite: {}", recipe.title, recipe.is_favorite);
            }
        }
        "trending" => print_listing(&catalog_from_config(&config).trending().await?),
        "search" => {
            let query = rest.join(" ");
            print_listing(&catalog_from_config(&config).search(&query).await?);
        }
        "category" => {
            let name = rest.first().ok_or(USAGE)?;
            print_listing(&catalog_from_config(&config).category(name).await?);
        }
        _ => return Err(USAGE.into()),
    }

    Ok(())
}

fn parse_generate_args(args: &[String]) -> Result<(GenerationRequest, bool), String> {
    let mut ingredients = Vec::new();
    let mut request = GenerationRequest::default();
    let mut save = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--cuisine" => {
                request.cuisine = Some(iter.next().ok_or("--cuisine needs a value")?.clone())
            }
            "--diet" => request.diet = Some(iter.next().ok_or("--diet needs a value")?.clone()),
            "--save" => save = true,
            other => ingredients.push(other.to_string()),
        }
    }

    request.ingredients = ingredients.join(" ");
    Ok((request, save))
}

fn print_listing(recipes: &[RecipeSummary]) {
    for recipe in recipes {
        println!("{}\n  {}", recipe.title, recipe.link);
    }
}
