//! User record: an account owning shelters and pet listings.
//!
//! User documents are keyed by the authentication uid rather than a
//! store-assigned id, so the id is known before the document exists.

use crate::error::{RecordResult, ValidationResult};
use crate::model::pet::Pet;
use crate::model::record::{PatchSet, Record, RecordId, doc};
use crate::model::shelter::Shelter;
use crate::model::value_objects::{EmailAddress, IdReference, SafeBoolean};
use crate::storage::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Plain slot record for constructing and updating a [`User`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSlots {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default)]
    pub shelter_ids: Vec<String>,
    #[serde(default)]
    pub pet_ids: Vec<String>,
}

/// A validated user account.
///
/// The shelter and pet lists are ordered id references; order is the
/// user's own, duplicates are not collapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: RecordId,
    email: EmailAddress,
    verified: SafeBoolean,
    shelter_ids: Vec<IdReference>,
    pet_ids: Vec<IdReference>,
}

impl User {
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn verified(&self) -> bool {
        self.verified.value()
    }

    pub fn shelter_ids(&self) -> &[IdReference] {
        &self.shelter_ids
    }

    pub fn pet_ids(&self) -> &[IdReference] {
        &self.pet_ids
    }

    pub fn check_email(raw: &str) -> String {
        EmailAddress::check("email", raw)
    }

    fn ids_match(current: &[IdReference], raw: &[String]) -> bool {
        current.len() == raw.len()
            && current
                .iter()
                .zip(raw.iter())
                .all(|(reference, id)| reference.as_str() == id)
    }

    async fn apply_inner<S: DocumentStore>(
        &mut self,
        backend: &S,
        slots: UserSlots,
    ) -> RecordResult<UserPatch> {
        let mut patch = UserPatch::default();

        let email = EmailAddress::new("email", slots.email)?;
        if email != self.email {
            self.email = email.clone();
            patch.email = Some(email);
        }

        // an absent flag keeps the stored value
        let verified = SafeBoolean::from_optional(slots.verified, self.verified.value());
        if verified != self.verified {
            self.verified = verified;
            patch.verified = Some(verified);
        }

        if !Self::ids_match(&self.shelter_ids, &slots.shelter_ids) {
            let shelter_ids =
                IdReference::resolve_list(backend, Shelter::COLLECTION, &slots.shelter_ids).await?;
            self.shelter_ids = shelter_ids.clone();
            patch.shelter_ids = Some(shelter_ids);
        }

        if !Self::ids_match(&self.pet_ids, &slots.pet_ids) {
            let pet_ids = IdReference::resolve_list(backend, Pet::COLLECTION, &slots.pet_ids).await?;
            self.pet_ids = pet_ids.clone();
            patch.pet_ids = Some(pet_ids);
        }

        Ok(patch)
    }
}

/// Changed-field subset of a user update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub email: Option<EmailAddress>,
    pub verified: Option<SafeBoolean>,
    pub shelter_ids: Option<Vec<IdReference>>,
    pub pet_ids: Option<Vec<IdReference>>,
}

impl PatchSet for UserPatch {
    fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.email.is_some() {
            fields.push("email");
        }
        if self.verified.is_some() {
            fields.push("verified");
        }
        if self.shelter_ids.is_some() {
            fields.push("shelterIds");
        }
        if self.pet_ids.is_some() {
            fields.push("petIds");
        }
        fields
    }

    fn to_document(&self) -> Value {
        let mut document = serde_json::Map::new();
        if let Some(email) = &self.email {
            document.insert("email".into(), json!(email.as_str()));
        }
        if let Some(verified) = &self.verified {
            document.insert("verified".into(), json!(verified.value()));
        }
        if let Some(shelter_ids) = &self.shelter_ids {
            let ids: Vec<&str> = shelter_ids.iter().map(IdReference::as_str).collect();
            document.insert("shelterIds".into(), json!(ids));
        }
        if let Some(pet_ids) = &self.pet_ids {
            let ids: Vec<&str> = pet_ids.iter().map(IdReference::as_str).collect();
            document.insert("petIds".into(), json!(ids));
        }
        Value::Object(document)
    }
}

impl Record for User {
    type Slots = UserSlots;
    type Patch = UserPatch;
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn document_from_slots(slots: &UserSlots) -> Value {
        serde_json::to_value(slots).unwrap_or(Value::Null)
    }

    fn slots_from_document(document: &Value) -> ValidationResult<UserSlots> {
        Ok(UserSlots {
            email: doc::string(document, "email")?,
            verified: doc::optional_bool(document, "verified")?,
            shelter_ids: doc::string_list(document, "shelterIds")?,
            pet_ids: doc::string_list(document, "petIds")?,
        })
    }

    fn to_document(&self) -> Value {
        let shelter_ids: Vec<&str> = self.shelter_ids.iter().map(IdReference::as_str).collect();
        let pet_ids: Vec<&str> = self.pet_ids.iter().map(IdReference::as_str).collect();
        json!({
            "email": self.email.as_str(),
            "verified": self.verified.value(),
            "shelterIds": shelter_ids,
            "petIds": pet_ids,
        })
    }

    async fn from_slots<S: DocumentStore>(
        backend: &S,
        id: RecordId,
        slots: UserSlots,
    ) -> RecordResult<Self> {
        Ok(Self {
            id,
            email: EmailAddress::new("email", slots.email)?,
            verified: SafeBoolean::from_optional(slots.verified, false),
            shelter_ids: IdReference::resolve_list(backend, Shelter::COLLECTION, &slots.shelter_ids)
                .await?,
            pet_ids: IdReference::resolve_list(backend, Pet::COLLECTION, &slots.pet_ids).await?,
        })
    }

    async fn apply<S: DocumentStore>(
        &mut self,
        backend: &S,
        slots: UserSlots,
    ) -> RecordResult<UserPatch> {
        let snapshot = self.clone();
        match self.apply_inner(backend, slots).await {
            Ok(patch) => Ok(patch),
            Err(e) => {
                *self = snapshot;
                Err(e)
            }
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User{{ id: {}, email: {}, verified: {}, shelters: {}, pets: {} }}",
            self.id,
            self.email,
            self.verified.value(),
            self.shelter_ids.len(),
            self.pet_ids.len()
        )
    }
}
