use dotenv::dotenv;
use pinboard::photos::Category;
use pinboard::screens::{FeedView, ScrollMetrics};
use pinboard::Pinboard;

fn print_view(label: &str, view: &FeedView) {
    match view {
        FeedView::Loading => println!("{}: loading", label),
        FeedView::Error { message } => println!("{}: failed ({})", label, message),
        FeedView::Ready {
            columns,
            end_reached,
            ..
        } => {
            println!(
                "{}: {} pins ({} left / {} right){}",
                label,
                columns.len(),
                columns.left.len(),
                columns.right.len(),
                if *end_reached { ", end reached" } else { "" }
            );
            for pin in columns.left.iter().take(3) {
                println!("  - {} [{}] {}", pin.title, pin.id, pin.url);
            }
        }
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();
    pretty_env_logger::init();

    let pinboard = Pinboard::from_env()?;
    println!("Starting Feed example");

    let mut home = pinboard.home_screen();
    if let Err(err) = home.load().await {
        log::error!("Loading the feed failed: {}", err);
    }
    print_view("All", &home.view());

    for category in [Category::Nature, Category::Architecture] {
        home.select_category(category).await?;
        print_view(category.label(), &home.view());
    }

    // Pretend the user scrolled to the end of the list
    let bottom = ScrollMetrics::new(5000.0, 5800.0, 800.0);
    if home.on_scroll(bottom).await? {
        print_view("Architecture after scrolling", &home.view());
    }

    let mut search = pinboard.search_screen();
    search.search_for("mountain cabins").await?;
    if let Some(results) = search.results() {
        print_view("Search", &results);
    }
    println!("Recent searches: {:?}", search.recent_searches());

    println!("Feed example completed");

    Ok(())
}
