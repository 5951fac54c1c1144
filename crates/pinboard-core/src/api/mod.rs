//! GraphQL client for the hosted notes API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{Note, NoteId};
use crate::util::{compact_text, is_http_url};
use crate::{Error, Result};

pub const LIST_NOTES_QUERY: &str = "\
query ListNotes {
  listNotes {
    items {
      id
      name
      description
      image
    }
  }
}";

pub const CREATE_NOTE_MUTATION: &str = "\
mutation CreateNote($input: CreateNoteInput!) {
  createNote(input: $input) {
    id
    name
    description
    image
  }
}";

pub const DELETE_NOTE_MUTATION: &str = "\
mutation DeleteNote($input: DeleteNoteInput!) {
  deleteNote(input: $input) {
    id
  }
}";

/// Input for `createNote`, mirroring the API's `CreateNoteInput` shape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NoteInput {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The note operations the screens depend on.
#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn list_notes(&self) -> Result<Vec<Note>>;
    async fn create_note(&self, input: NoteInput) -> Result<Note>;
    async fn delete_note(&self, id: &NoteId) -> Result<()>;
}

/// HTTP GraphQL client authenticated with a session access token.
#[derive(Clone)]
pub struct NotesApiClient {
    endpoint: String,
    access_token: String,
    client: Client,
}

impl NotesApiClient {
    pub fn new(endpoint: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into().trim().trim_end_matches('/').to_string();
        if !is_http_url(&endpoint) {
            return Err(Error::InvalidInput(format!(
                "API endpoint must include http:// or https://, got {endpoint:?}"
            )));
        }

        Ok(Self {
            endpoint,
            access_token: access_token.into(),
            client: Client::builder().build()?,
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let request = GraphQlRequest { query, variables };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api(format!(
                "Notes API returned {}: {}",
                status.as_u16(),
                compact_text(&body)
            )));
        }

        parse_graphql_response(&body)
    }
}

#[async_trait]
impl NotesApi for NotesApiClient {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let data: ListNotesData = self
            .execute(LIST_NOTES_QUERY, serde_json::Value::Null)
            .await?;
        Ok(data.list_notes.items)
    }

    async fn create_note(&self, input: NoteInput) -> Result<Note> {
        let variables = serde_json::json!({ "input": input });
        let data: CreateNoteData = self.execute(CREATE_NOTE_MUTATION, variables).await?;
        Ok(data.create_note)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let variables = serde_json::json!({ "input": { "id": id } });
        let _: DeleteNoteData = self.execute(DELETE_NOTE_MUTATION, variables).await?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct GraphQlRequest {
    query: &'static str,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Decode a GraphQL response body, surfacing the first API error.
fn parse_graphql_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: GraphQlResponse<T> = serde_json::from_str(body)?;
    if let Some(error) = response.errors.first() {
        return Err(Error::Api(compact_text(&error.message)));
    }
    response
        .data
        .ok_or_else(|| Error::Api("GraphQL response contained no data".to_string()))
}

#[derive(Debug, Deserialize)]
struct ListNotesData {
    #[serde(rename = "listNotes")]
    list_notes: NoteConnection,
}

#[derive(Debug, Deserialize)]
struct NoteConnection {
    items: Vec<Note>,
}

#[derive(Debug, Deserialize)]
struct CreateNoteData {
    #[serde(rename = "createNote")]
    create_note: Note,
}

#[derive(Debug, Deserialize)]
struct DeleteNoteData {
    #[serde(rename = "deleteNote")]
    #[allow(dead_code)]
    delete_note: DeletedNote,
}

#[derive(Debug, Deserialize)]
struct DeletedNote {
    #[allow(dead_code)]
    id: NoteId,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn client_rejects_non_http_endpoints() {
        assert!(NotesApiClient::new("api.example.com/graphql", "token").is_err());
        assert!(NotesApiClient::new("https://api.example.com/graphql/", "token").is_ok());
    }

    #[test]
    fn parse_response_extracts_note_list() {
        let body = r#"{
            "data": {
                "listNotes": {
                    "items": [
                        {"id": "n-1", "name": "Trip", "description": "Photos", "image": "Trip"},
                        {"id": "n-2", "name": "Todo", "description": "Chores"}
                    ]
                }
            }
        }"#;

        let data: ListNotesData = parse_graphql_response(body).unwrap();
        assert_eq!(data.list_notes.items.len(), 2);
        assert_eq!(data.list_notes.items[0].name, "Trip");
        assert_eq!(data.list_notes.items[1].image, None);
    }

    #[test]
    fn parse_response_surfaces_first_graphql_error() {
        let body = r#"{
            "data": null,
            "errors": [
                {"message": "Not Authorized to access listNotes on type Query"},
                {"message": "second error"}
            ]
        }"#;

        let error = parse_graphql_response::<ListNotesData>(body).unwrap_err();
        match error {
            Error::Api(message) => {
                assert!(message.contains("Not Authorized"));
                assert!(!message.contains("second error"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_response_requires_data() {
        let body = r#"{"data": null, "errors": []}"#;
        assert!(parse_graphql_response::<ListNotesData>(body).is_err());
    }

    #[test]
    fn note_input_omits_absent_image() {
        let input = NoteInput {
            name: "Trip".to_string(),
            description: "Photos".to_string(),
            image: None,
        };
        let rendered = serde_json::to_value(&input).unwrap();
        assert_eq!(
            rendered,
            serde_json::json!({"name": "Trip", "description": "Photos"})
        );

        let input = NoteInput {
            image: Some("Trip".to_string()),
            ..input
        };
        let rendered = serde_json::to_value(&input).unwrap();
        assert_eq!(rendered["image"], "Trip");
    }
}
