//! Command dispatch for the `barcart` binary.

use anyhow::{anyhow, bail, Context, Result};
use tracing::debug;

use barcart_core::config::check_random_count;
use barcart_core::utils::{format_date, truncate_string};
use barcart_core::{
    ApiClient, BaseLiquor, Cocktail, Config, DrinkStrength, FavoritesRepository, Mood,
    PreferenceSelection, Session, Sweetness,
};

/// Maximum width of a cocktail name in list output
const NAME_WIDTH: usize = 32;

/// Services a command can use
pub struct App {
    pub api: ApiClient,
    pub favorites: FavoritesRepository,
    pub session: Session,
    pub random_count: usize,
}

pub fn print_usage() {
    eprintln!(
        "Usage: barcart <command> [args]

Browse:
  search <name>             Search cocktails by name
  random [count]            Random cocktails
  popular                   Popular cocktails
  ingredient <name>         Cocktails made with an ingredient
  category <name>           Cocktails in a category
  alcohol <type>            Alcoholic, Non_Alcoholic or Optional_alcohol
  categories                List categories
  ingredients               List ingredients
  show <id>                 Show a recipe

Favorites:
  favorites [--json]        List favorites
  favorites clear           Remove all favorites
  fav <id>                  Add or remove a favorite

Profile:
  prefs                     Show preferences
  prefs options             List the valid choices
  prefs set <strength> <sweetness> <liquor> <mood>
  stats                     Show your dashboard
  reset                     Forget preferences, stats and favorites

Settings:
  config                    Show settings
  config set <key> <value>  Set data-dir, api-url or random-count (1-100)"
    );
}

/// Fetch the argument at `index` or fail with a usage hint.
fn arg<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing {}. Run `barcart help` for usage.", what))
}

/// Count for `random`: the configured default, or an explicit 1..=100.
fn parse_count(arg: Option<&String>, default: usize) -> Result<usize> {
    let Some(n) = arg else {
        return Ok(default);
    };
    let count = n.parse().with_context(|| format!("Invalid count: {}", n))?;
    check_random_count(count)
}

/// `barcart config [set <key> <value>]`. Runs without opening the store.
pub fn configure(args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        None => {
            let config = Config::load()?;
            println!("Config file:  {}", Config::config_path()?.display());
            println!("Data dir:     {}", config.data_dir()?.display());
            println!("API URL:      {}", config.api_base_url());
            println!("Random count: {}", config.random_count());
        }
        Some("set") => {
            let key = arg(args, 1, "setting name")?;
            let value = arg(args, 2, "setting value")?;
            // Start from the file alone so environment overrides are not saved
            let mut config = Config::load_file()?;
            config.set(key, value)?;
            config.save()?;
            debug!(key = key, value = value, "Saved setting");
            println!("Saved {} = {}", key, value);
        }
        Some(other) => bail!("Unknown config option: {}", other),
    }
    Ok(())
}

pub async fn run(app: &App, args: &[String]) -> Result<()> {
    let command = arg(args, 0, "command")?;
    debug!(command = command, "Running command");

    match command {
        "search" => {
            let query = args[1..].join(" ");
            if query.is_empty() {
                bail!("Missing search text");
            }
            print_cocktails(app, &app.api.search_by_name(&query).await?).await;
        }
        "random" => {
            let count = parse_count(args.get(1), app.random_count)?;
            print_cocktails(app, &app.api.fetch_random(count).await?).await;
        }
        "popular" => print_cocktails(app, &app.api.fetch_popular().await?).await,
        "ingredient" => {
            let ingredient = arg(args, 1, "ingredient")?;
            print_cocktails(app, &app.api.filter_by_ingredient(ingredient, None).await?).await;
        }
        "category" => {
            let category = arg(args, 1, "category")?;
            print_cocktails(app, &app.api.filter_by_category(category).await?).await;
        }
        "alcohol" => {
            let alcohol = arg(args, 1, "alcohol type")?;
            print_cocktails(app, &app.api.filter_by_alcohol(alcohol).await?).await;
        }
        "categories" => {
            for category in app.api.list_categories().await? {
                println!("{}", category);
            }
        }
        "ingredients" => {
            for ingredient in app.api.list_ingredients().await? {
                println!("{}", ingredient);
            }
        }
        "show" => show(app, arg(args, 1, "cocktail id")?).await?,
        "fav" => toggle_favorite(app, arg(args, 1, "cocktail id")?).await?,
        "favorites" => match args.get(1).map(String::as_str) {
            Some("clear") => clear_favorites(app).await?,
            Some("--json") => {
                let favorites = app.favorites.list().await;
                println!("{}", serde_json::to_string_pretty(&favorites)?);
            }
            Some(other) => bail!("Unknown favorites option: {}", other),
            None => {
                let favorites = app.favorites.list().await;
                if favorites.is_empty() {
                    println!("No Favorites Yet");
                    println!("Start exploring cocktails and add them to your favorites!");
                } else {
                    print_cocktails(app, &favorites).await;
                }
            }
        },
        "prefs" => match args.get(1).map(String::as_str) {
            None => print_preferences(app),
            Some("options") => print_options(),
            Some("set") => {
                let selection = PreferenceSelection::new(
                    arg(args, 2, "drink strength")?,
                    arg(args, 3, "sweetness")?,
                    arg(args, 4, "base liquor")?,
                    arg(args, 5, "mood")?,
                );
                app.session
                    .update_preferences_from(&selection)
                    .await
                    .context("Failed to save preferences")?;
                println!("Preferences saved");
                print_preferences(app);
            }
            Some(other) => bail!("Unknown prefs option: {}", other),
        },
        "stats" => dashboard(app).await,
        "reset" => {
            let favorites = app.favorites.clear().await;
            let profile = app.session.clear().await;
            favorites.context("Failed to clear favorites")?;
            profile.context("Failed to clear user data")?;
            println!("All user data cleared");
        }
        other => bail!("Unknown command: {}. Run `barcart help` for usage.", other),
    }

    Ok(())
}

async fn print_cocktails(app: &App, cocktails: &[Cocktail]) {
    if cocktails.is_empty() {
        println!("No cocktails found");
        return;
    }
    let favorites = app.favorites.list().await;
    for c in cocktails {
        let marker = if favorites.iter().any(|f| f.id == c.id) { "♥" } else { " " };
        println!(
            "{} {:>6}  {:<width$}  {}",
            marker,
            c.id,
            truncate_string(&c.name, NAME_WIDTH),
            c.category.as_deref().unwrap_or(""),
            width = NAME_WIDTH
        );
    }
}

async fn fetch(app: &App, id: &str) -> Result<Cocktail> {
    app.api
        .lookup_by_id(id)
        .await?
        .ok_or_else(|| anyhow!("No cocktail with id {}", id))
}

async fn show(app: &App, id: &str) -> Result<()> {
    let cocktail = fetch(app, id).await?;
    let favorited = app.favorites.contains(&cocktail.id).await;

    println!("{}{}", cocktail.name, if favorited { "  ♥" } else { "" });
    let details: Vec<&str> = [&cocktail.category, &cocktail.alcoholic, &cocktail.glass]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .collect();
    if !details.is_empty() {
        println!("{}", details.join(" · "));
    }

    let ingredients = cocktail.ingredients();
    if !ingredients.is_empty() {
        println!("\nIngredients:");
        for ingredient in ingredients {
            println!("  - {}", ingredient.display());
        }
    }
    if let Some(ref instructions) = cocktail.instructions {
        println!("\nInstructions:\n  {}", instructions);
    }

    app.session.record_tried();
    Ok(())
}

async fn toggle_favorite(app: &App, id: &str) -> Result<()> {
    let cocktail = fetch(app, id).await?;
    let favorited = app
        .favorites
        .toggle(&cocktail)
        .await
        .context("Failed to update favorites")?;
    app.session.sync_favorite_count(&app.favorites).await;

    if favorited {
        println!("Added to Favorites: {}", cocktail.name);
    } else {
        println!("Removed from Favorites: {}", cocktail.name);
    }
    Ok(())
}

async fn clear_favorites(app: &App) -> Result<()> {
    app.favorites
        .clear()
        .await
        .context("Failed to clear favorites")?;
    app.session.sync_favorite_count(&app.favorites).await;
    println!("Favorites cleared");
    Ok(())
}

fn print_preferences(app: &App) {
    match app.session.preferences() {
        Some(prefs) => {
            println!("Drink strength: {}", prefs.drink_strength);
            println!("Sweetness:      {}", prefs.sweetness);
            println!("Base liquor:    {}", prefs.base_liquor);
            println!("Mood:           {}", prefs.mood);
        }
        None => println!("No preferences yet. Set them with `barcart prefs set`."),
    }
}

fn join_options<T: std::fmt::Display>(options: &[T]) -> String {
    options
        .iter()
        .map(|o| format!("\"{}\"", o))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_options() {
    println!("Drink strength: {}", join_options(DrinkStrength::ALL));
    println!("Sweetness:      {}", join_options(Sweetness::ALL));
    println!("Base liquor:    {}", join_options(BaseLiquor::ALL));
    println!("Mood:           {}", join_options(Mood::ALL));
}

async fn dashboard(app: &App) {
    let stats = app.session.sync_favorite_count(&app.favorites).await;

    println!("Favorites:       {}", stats.total_favorites);
    println!("Cocktails tried: {}", stats.cocktails_tried);
    println!("Favorite spirit: {}", stats.favorite_spirit);
    println!("Sessions:        {}", stats.total_sessions);
    println!(
        "Last active:     {} ({})",
        format_date(&stats.last_active),
        stats.last_active_display()
    );
    println!();
    print_preferences(app);
}
