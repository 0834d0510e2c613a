//! Message record: an adoption inquiry addressed to a shelter, optionally
//! about one of its pets.

use crate::error::{RecordResult, ValidationResult};
use crate::model::pet::Pet;
use crate::model::record::{self, PatchSet, Record, RecordId, doc};
use crate::model::shelter::Shelter;
use crate::model::value_objects::{
    DateInterval, EmailAddress, IdReference, NonEmptyString, SafeDate, StringRules,
};
use crate::storage::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

const CONTENT_RULES: StringRules = StringRules::length(1, 500);
const SENT_AT_INTERVAL: DateInterval = DateInterval::NONE;

/// Plain slot record for constructing and updating a [`Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSlots {
    pub content: String,
    pub sender_email: String,
    pub shelter_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<String>,
    pub sent_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
}

/// A validated message.
///
/// The shelter reference is required; the pet reference is optional but
/// must resolve when present. Both are re-checked against the backend
/// whenever they are (re-)assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    id: RecordId,
    content: NonEmptyString,
    sender_email: EmailAddress,
    shelter_id: IdReference,
    pet_id: Option<IdReference>,
    sent_at: SafeDate,
    creator_id: Option<RecordId>,
}

impl Message {
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    pub fn sender_email(&self) -> &str {
        self.sender_email.as_str()
    }

    pub fn shelter_id(&self) -> &IdReference {
        &self.shelter_id
    }

    pub fn pet_id(&self) -> Option<&IdReference> {
        self.pet_id.as_ref()
    }

    pub fn sent_at(&self) -> SafeDate {
        self.sent_at
    }

    pub fn creator_id(&self) -> Option<&str> {
        self.creator_id.as_ref().map(RecordId::as_str)
    }

    // Message-returning field validators for form code: "" means valid.

    pub fn check_content(raw: &str) -> String {
        NonEmptyString::check("content", raw, &CONTENT_RULES)
    }

    pub fn check_sender_email(raw: &str) -> String {
        EmailAddress::check("senderEmail", raw)
    }

    pub fn check_sent_at(raw: &str) -> String {
        SafeDate::check("sentAt", raw, &SENT_AT_INTERVAL)
    }

    pub async fn check_shelter_id<S: DocumentStore>(backend: &S, raw: &str) -> String {
        IdReference::check(backend, Shelter::COLLECTION, raw).await
    }

    /// An empty pet id is fine — the message is then about the shelter.
    pub async fn check_pet_id<S: DocumentStore>(backend: &S, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        IdReference::check(backend, Pet::COLLECTION, raw).await
    }

    async fn resolve_pet<S: DocumentStore>(
        backend: &S,
        raw: &Option<String>,
    ) -> RecordResult<Option<IdReference>> {
        match raw {
            None => Ok(None),
            Some(id) => Ok(Some(IdReference::resolve(backend, Pet::COLLECTION, id).await?)),
        }
    }

    async fn apply_inner<S: DocumentStore>(
        &mut self,
        backend: &S,
        slots: MessageSlots,
    ) -> RecordResult<MessagePatch> {
        let mut patch = MessagePatch::default();

        let content = NonEmptyString::new("content", slots.content, &CONTENT_RULES)?;
        if content != self.content {
            self.content = content.clone();
            patch.content = Some(content);
        }

        let sender_email = EmailAddress::new("senderEmail", slots.sender_email)?;
        if sender_email != self.sender_email {
            self.sender_email = sender_email.clone();
            patch.sender_email = Some(sender_email);
        }

        if slots.shelter_id != self.shelter_id.as_str() {
            let shelter_id =
                IdReference::resolve(backend, Shelter::COLLECTION, &slots.shelter_id).await?;
            self.shelter_id = shelter_id.clone();
            patch.shelter_id = Some(shelter_id);
        }

        if slots.pet_id.as_deref() != self.pet_id.as_ref().map(IdReference::as_str) {
            let pet_id = Self::resolve_pet(backend, &slots.pet_id).await?;
            self.pet_id = pet_id.clone();
            patch.pet_id = Some(pet_id);
        }

        let sent_at = SafeDate::parse("sentAt", &slots.sent_at, &SENT_AT_INTERVAL)?;
        if sent_at != self.sent_at {
            self.sent_at = sent_at;
            patch.sent_at = Some(sent_at);
        }

        Ok(patch)
    }
}

/// Changed-field subset of a message update.
///
/// `pet_id` is doubly optional: the outer level marks "changed", the inner
/// one carries the new value, which may be "no pet anymore".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePatch {
    pub content: Option<NonEmptyString>,
    pub sender_email: Option<EmailAddress>,
    pub shelter_id: Option<IdReference>,
    pub pet_id: Option<Option<IdReference>>,
    pub sent_at: Option<SafeDate>,
}

impl PatchSet for MessagePatch {
    fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.content.is_some() {
            fields.push("content");
        }
        if self.sender_email.is_some() {
            fields.push("senderEmail");
        }
        if self.shelter_id.is_some() {
            fields.push("shelterId");
        }
        if self.pet_id.is_some() {
            fields.push("petId");
        }
        if self.sent_at.is_some() {
            fields.push("sentAt");
        }
        fields
    }

    fn to_document(&self) -> Value {
        let mut document = serde_json::Map::new();
        if let Some(content) = &self.content {
            document.insert("content".into(), json!(content.as_str()));
        }
        if let Some(sender_email) = &self.sender_email {
            document.insert("senderEmail".into(), json!(sender_email.as_str()));
        }
        if let Some(shelter_id) = &self.shelter_id {
            document.insert("shelterId".into(), json!(shelter_id.as_str()));
        }
        if let Some(pet_id) = &self.pet_id {
            match pet_id {
                Some(reference) => document.insert("petId".into(), json!(reference.as_str())),
                None => document.insert("petId".into(), Value::Null),
            };
        }
        if let Some(sent_at) = &self.sent_at {
            document.insert("sentAt".into(), json!(sent_at.to_rfc3339()));
        }
        Value::Object(document)
    }
}

impl Record for Message {
    type Slots = MessageSlots;
    type Patch = MessagePatch;
    const COLLECTION: &'static str = "messages";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn document_from_slots(slots: &MessageSlots) -> Value {
        serde_json::to_value(slots).unwrap_or(Value::Null)
    }

    fn slots_from_document(document: &Value) -> ValidationResult<MessageSlots> {
        Ok(MessageSlots {
            content: doc::string(document, "content")?,
            sender_email: doc::string(document, "senderEmail")?,
            shelter_id: doc::string(document, "shelterId")?,
            pet_id: doc::optional_string(document, "petId")?,
            sent_at: doc::string(document, "sentAt")?,
            creator_id: doc::optional_string(document, "creatorId")?,
        })
    }

    fn to_document(&self) -> Value {
        let mut document = json!({
            "content": self.content.as_str(),
            "senderEmail": self.sender_email.as_str(),
            "shelterId": self.shelter_id.as_str(),
            "sentAt": self.sent_at.to_rfc3339(),
        });
        if let Some(pet) = &self.pet_id {
            document["petId"] = json!(pet.as_str());
        }
        if let Some(creator) = &self.creator_id {
            document["creatorId"] = json!(creator.as_str());
        }
        document
    }

    async fn from_slots<S: DocumentStore>(
        backend: &S,
        id: RecordId,
        slots: MessageSlots,
    ) -> RecordResult<Self> {
        Ok(Self {
            id,
            content: NonEmptyString::new("content", slots.content, &CONTENT_RULES)?,
            sender_email: EmailAddress::new("senderEmail", slots.sender_email)?,
            shelter_id: IdReference::resolve(backend, Shelter::COLLECTION, &slots.shelter_id)
                .await?,
            pet_id: Self::resolve_pet(backend, &slots.pet_id).await?,
            sent_at: SafeDate::parse("sentAt", &slots.sent_at, &SENT_AT_INTERVAL)?,
            creator_id: record::optional_record_id(&slots.creator_id)?,
        })
    }

    async fn apply<S: DocumentStore>(
        &mut self,
        backend: &S,
        slots: MessageSlots,
    ) -> RecordResult<MessagePatch> {
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

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Message{{ id: {}, from: {}, shelter: {}, sent: {} }}",
            self.id, self.sender_email, self.shelter_id, self.sent_at
        )
    }
}
