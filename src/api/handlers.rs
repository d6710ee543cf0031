//! HTTP endpoint handlers.
//!
//! - `GET /health` - Health check
//! - `POST /table` - Create a table
//! - `PUT /table/{id}` - Add columns to a table
//! - `POST /table/{id}/row` - Insert one row
//! - `GET /table/{id}/rows` - Read every row

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::error::AppError;
use crate::api::state::AppState;
use crate::libs::schema::normalize_table_id;
use crate::libs::{FieldDescriptor, TableDescriptor, TableError};

/// One `{name, type}` entry as it appears in a request body.
#[derive(Debug, Deserialize)]
pub struct FieldRequest {
    pub name: Option<String>,
    /// Kept as raw JSON so a non-string type is reported as a bad field type.
    #[serde(rename = "type")]
    pub field_type: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub name: Option<String>,
    pub fields: Option<Vec<FieldRequest>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTableRequest {
    pub fields: Option<Vec<FieldRequest>>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CreateTableResponse {
    pub message: &'static str,
    pub table_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Validates every field before anything touches the database.
fn parse_fields(fields: Option<Vec<FieldRequest>>) -> Result<Vec<FieldDescriptor>, TableError> {
    let fields = fields.unwrap_or_default();
    if fields.is_empty() {
        return Err(TableError::InvalidInput("fields are required".into()));
    }
    fields
        .into_iter()
        .map(|f| {
            let name = f.name.unwrap_or_default();
            match f.field_type {
                None | Some(Value::Null) => Err(TableError::InvalidInput(format!(
                    "field '{}' has no type",
                    name
                ))),
                Some(Value::String(field_type)) => FieldDescriptor::parse(&name, &field_type),
                Some(other) => Err(TableError::InvalidFieldType(other.to_string())),
            }
        })
        .collect()
}

/// Path ids that cannot name a table are reported as missing tables.
fn table_id(id: &str) -> Result<String, TableError> {
    normalize_table_id(id).map_err(|_| TableError::TableNotFound(id.to_string()))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// Create a table.
///
/// ```json
/// {"name": "DynamicTable", "fields": [{"name": "field1", "type": "string"}]}
/// ```
///
/// Responds `201 {"message": "Table created successfully", "table_id": "dynamictable"}`.
pub async fn create_table(
    State(state): State<AppState>,
    payload: Result<Json<CreateTableRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTableResponse>), AppError> {
    let Json(request) = payload?;
    let name = request.name.unwrap_or_default();
    if name.is_empty() || request.fields.as_ref().is_none_or(|f| f.is_empty()) {
        return Err(TableError::InvalidInput("name and fields are required".into()).into());
    }
    let descriptor = TableDescriptor::new(&name, parse_fields(request.fields)?)?;

    let table_id = state.manager().create_table(&descriptor).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateTableResponse {
            message: "Table created successfully",
            table_id,
        }),
    ))
}

/// Add columns to an existing table.
///
/// ```json
/// {"fields": [{"name": "field4", "type": "boolean"}]}
/// ```
pub async fn update_table(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTableRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = payload?;
    let fields = parse_fields(request.fields)?;
    let table_id = table_id(&id)?;

    state.manager().add_columns(&table_id, &fields).await?;
    Ok(Json(MessageResponse {
        message: "Table updated successfully",
    }))
}

/// Insert one row. The body is a flat object of field name to value.
pub async fn add_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(values) = payload?;
    let table_id = table_id(&id)?;

    state.manager().add_row(&table_id, &values).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Row added successfully",
        }),
    ))
}

/// Every row of the table, in insertion order, as a JSON array of objects.
pub async fn get_rows(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Map<String, Value>>>, AppError> {
    let table_id = table_id(&id)?;
    let rows = state.manager().get_all_rows(&table_id).await?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::FieldType;
    use serde_json::json;

    fn field(name: &str, ty: &str) -> FieldRequest {
        FieldRequest {
            name: Some(name.into()),
            field_type: Some(ty.into()),
        }
    }

    #[test]
    fn parses_all_three_types() {
        let fields = parse_fields(Some(vec![
            field("a", "string"),
            field("b", "number"),
            field("c", "boolean"),
        ]))
        .unwrap();
        let types: Vec<FieldType> = fields.iter().map(|f| f.field_type).collect();
        assert_eq!(
            types,
            vec![FieldType::String, FieldType::Number, FieldType::Boolean]
        );
    }

    #[test]
    fn one_bad_type_rejects_the_whole_list() {
        let err = parse_fields(Some(vec![field("a", "string"), field("b", "float")])).unwrap_err();
        assert!(matches!(err, TableError::InvalidFieldType(t) if t == "float"));
    }

    #[test]
    fn non_string_type_is_an_invalid_field_type() {
        for raw in [json!(5), json!(true), json!({}), json!(["string"])] {
            let err = parse_fields(Some(vec![FieldRequest {
                name: Some("a".into()),
                field_type: Some(raw.clone()),
            }]))
            .unwrap_err();
            assert!(matches!(err, TableError::InvalidFieldType(t) if t == raw.to_string()));
        }
    }

    #[test]
    fn missing_fields_are_invalid_input() {
        assert!(matches!(parse_fields(None), Err(TableError::InvalidInput(_))));
        assert!(matches!(
            parse_fields(Some(vec![FieldRequest {
                name: Some("a".into()),
                field_type: None
            }])),
            Err(TableError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_fields(Some(vec![FieldRequest {
                name: Some("a".into()),
                field_type: Some(Value::Null)
            }])),
            Err(TableError::InvalidInput(_))
        ));
    }

    #[test]
    fn path_ids_are_normalized() {
        assert_eq!(table_id("DynamicTable").unwrap(), "dynamictable");
        assert!(matches!(
            table_id("no;pe"),
            Err(TableError::TableNotFound(_))
        ));
    }
}
