//! Basic example composing and sending resource requests.
//!
//! Run with:
//! ```
//! RQBUILDER_APPEND_API=false cargo run --example basic
//! ```

use rqbuilder::{Client, SortDirection};

#[tokio::main]
async fn main() -> rqbuilder::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let client = Client::from_env()?;
    println!("Connected to: {}", client.base_url());

    // Compose a query without sending it
    let builder = client
        .make("posts")
        .filter("userId", 1)?
        .order_by("id", SortDirection::Desc)
        .limit(5)?;
    println!("\n--- Composed URL ---");
    println!("{}", builder.url()?);

    // Nested resource: /users/1/posts
    println!("\n--- Posts of user 1 ---");
    let posts: Vec<serde_json::Value> = client
        .make("posts")
        .from("users", 1)
        .get()
        .await?
        .into_data()?;
    println!("Found {} posts", posts.len());

    // Single record, raw payload
    println!("\n--- Post 1 ---");
    let post = client.make_raw("posts").find(1).await?;
    println!("{}", serde_json::to_string_pretty(&post)?);

    // Arbitrary endpoint outside the resource convention
    let todos = client.get_path("todos/1").await?;
    println!("\n--- todos/1 ({}) ---\n{}", todos.status, todos.data);

    Ok(())
}
