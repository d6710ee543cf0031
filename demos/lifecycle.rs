use dyntables::{FieldDescriptor, FieldType, TableDescriptor, TableManager};
use serde_json::{Map, Value, json};

fn row(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost:5432/postgres?connect_timeout=10".into());
    let manager = TableManager::connect(&url, 5).await?;

    let descriptor = TableDescriptor::new(
        "DemoPeople",
        vec![
            FieldDescriptor::new("name", FieldType::String),
            FieldDescriptor::new("age", FieldType::Number),
        ],
    )?;
    let table_id = manager.create_table(&descriptor).await?;
    println!("created {}", table_id);

    let ada = row(json!({"name": "Ada", "age": 36}));
    manager.add_row(&table_id, &ada).await?;

    manager
        .add_columns(&table_id, &[FieldDescriptor::new("admin", FieldType::Boolean)])
        .await?;
    let grace = row(json!({"name": "Grace", "age": 45, "admin": true}));
    manager.add_row(&table_id, &grace).await?;

    for r in manager.get_all_rows(&table_id).await? {
        println!("{}", Value::Object(r));
    }

    sqlx::query(&format!("DROP TABLE \"{}\"", table_id))
        .execute(manager.pool())
        .await?;
    Ok(())
}
