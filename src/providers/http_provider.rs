use std::time::Duration;

use log::{debug, error};
use reqwest::blocking::{Client, Response};

use crate::error::{Operation, RemoteCause, RemoteError};
use crate::note_entry::{NoteDraft, NoteEntry};
use crate::providers::provider::NotesProvider;

/// Talks to a CRUD style REST resource: `GET base`, `POST base`, `DELETE base/<id>`.
pub struct HttpNotesProvider {
    base_url: String,
    client: Client,
}

impl HttpNotesProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpNotesProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn note_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

impl NotesProvider for HttpNotesProvider {
    fn list_notes(&self) -> Result<Vec<NoteEntry>, RemoteError> {
        debug!("GET {}", self.base_url);
        let body = self
            .client
            .get(&self.base_url)
            .send()
            .map_err(|e| transport(Operation::List, e))
            .and_then(|resp| read_body(Operation::List, resp))
            .inspect_err(|e| error!("{}", e))?;

        decode_list(&body).inspect_err(|e| error!("{}", e))
    }

    fn create_note(&self, draft: &NoteDraft) -> Result<NoteEntry, RemoteError> {
        debug!(
            "POST {} title={:?} description={:?}",
            self.base_url,
            draft.title(),
            draft.description()
        );
        let body = self
            .client
            .post(&self.base_url)
            .json(draft)
            .send()
            .map_err(|e| transport(Operation::Create, e))
            .and_then(|resp| read_body(Operation::Create, resp))
            .inspect_err(|e| error!("{}", e))?;

        decode_created(&body).inspect_err(|e| error!("{}", e))
    }

    fn delete_note(&self, id: &str) -> Result<(), RemoteError> {
        let url = self.note_url(id);
        debug!("DELETE {}", url);
        self.client
            .delete(&url)
            .send()
            .map_err(|e| transport(Operation::Delete, e))
            .and_then(|resp| read_body(Operation::Delete, resp))
            .inspect_err(|e| error!("{}", e))?;

        Ok(())
    }
}

fn transport(operation: Operation, err: reqwest::Error) -> RemoteError {
    RemoteError::new(operation, RemoteCause::Transport(err))
}

// Non-2xx statuses become errors carrying whatever body the remote sent.
fn read_body(operation: Operation, resp: Response) -> Result<String, RemoteError> {
    let status = resp.status();
    let body = resp.text().map_err(|e| transport(operation, e))?;
    check_status(operation, status.as_u16(), body)
}

fn check_status(operation: Operation, status: u16, body: String) -> Result<String, RemoteError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(RemoteError::new(
            operation,
            RemoteCause::Status { status, body },
        ))
    }
}

fn decode_list(body: &str) -> Result<Vec<NoteEntry>, RemoteError> {
    serde_json::from_str(body).map_err(|e| RemoteError::malformed(Operation::List, e.to_string()))
}

fn decode_created(body: &str) -> Result<NoteEntry, RemoteError> {
    serde_json::from_str(body).map_err(|e| RemoteError::malformed(Operation::Create, e.to_string()))
}
