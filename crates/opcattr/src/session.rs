//! Channel and session gate in front of the API.
//!
//! A request arrives on a [`SecureChannel`]. It can only be served when the channel has
//! an activated [`Session`] and that session is bound to an application (an
//! [`AttributeApi`]). Otherwise the whole batch fails with an error; this is the only
//! way a Read or Write batch fails as a whole.

use crate::api::AttributeApi;
use crate::error::{OpcAttrError, Result};
use crate::services::{ReadRequest, ReadResponse, WriteRequest, WriteResponse};
use crate::store::NodeStore;
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

pub struct Session<S: NodeStore> {
    id: Uuid,
    application: Option<Arc<AttributeApi<S>>>,
}

impl<S: NodeStore> Session<S> {
    /// A session bound to `application`.
    pub fn new(application: Arc<AttributeApi<S>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            application: Some(application),
        }
    }

    /// A session not yet bound to any application.
    pub fn unbound() -> Self {
        Self {
            id: Uuid::new_v4(),
            application: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn application(&self) -> Option<&Arc<AttributeApi<S>>> {
        self.application.as_ref()
    }
}

pub struct SecureChannel<S: NodeStore> {
    id: u32,
    session: Option<Session<S>>,
}

impl<S: NodeStore> SecureChannel<S> {
    pub fn new(id: u32) -> Self {
        Self { id, session: None }
    }

    pub fn with_session(mut self, session: Session<S>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn session(&self) -> Option<&Session<S>> {
        self.session.as_ref()
    }

    /// Replaces the channel's session, returning the previous one.
    pub fn attach(&mut self, session: Session<S>) -> Option<Session<S>> {
        self.session.replace(session)
    }

    pub fn detach(&mut self) -> Option<Session<S>> {
        self.session.take()
    }

    fn application(&self) -> Result<&AttributeApi<S>> {
        let Some(session) = &self.session else {
            warn!(channel = self.id, "request on channel without session");
            return Err(OpcAttrError::SessionMissing);
        };
        match &session.application {
            Some(application) => Ok(application.as_ref()),
            None => {
                warn!(channel = self.id, session = %session.id, "session has no application");
                Err(OpcAttrError::ApplicationMissing)
            }
        }
    }

    #[instrument(skip_all, fields(channel = self.id))]
    pub fn service_read(&self, request: &ReadRequest) -> Result<ReadResponse> {
        Ok(self.application()?.read(request))
    }

    #[instrument(skip_all, fields(channel = self.id))]
    pub fn service_write(&self, request: &WriteRequest) -> Result<WriteResponse> {
        Ok(self.application()?.write(request))
    }
}
