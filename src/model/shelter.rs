//! Shelter record: an adoption shelter reachable by mail and phone.

use crate::error::{RecordResult, ValidationResult};
use crate::model::record::{self, PatchSet, Record, RecordId, doc};
use crate::model::value_objects::{
    EmailAddress, NonEmptyString, OptionalString, PhoneNumber, StringRules,
};
use crate::storage::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

const NAME_RULES: StringRules = StringRules::length(1, 120);
const ADDRESS_RULES: StringRules = StringRules::length(1, 500);
const OFFICE_HOURS_RULES: StringRules = StringRules::max_len(200);

/// Plain slot record for constructing and updating a [`Shelter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterSlots {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub office_hours: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
}

/// A validated shelter.
#[derive(Debug, Clone, PartialEq)]
pub struct Shelter {
    id: RecordId,
    name: NonEmptyString,
    address: NonEmptyString,
    phone: PhoneNumber,
    email: EmailAddress,
    office_hours: OptionalString,
    creator_id: Option<RecordId>,
}

impl Shelter {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn office_hours(&self) -> &str {
        self.office_hours.as_str()
    }

    pub fn creator_id(&self) -> Option<&str> {
        self.creator_id.as_ref().map(RecordId::as_str)
    }

    // Message-returning field validators for form code: "" means valid.

    pub fn check_name(raw: &str) -> String {
        NonEmptyString::check("name", raw, &NAME_RULES)
    }

    pub fn check_address(raw: &str) -> String {
        NonEmptyString::check("address", raw, &ADDRESS_RULES)
    }

    pub fn check_phone(raw: &str) -> String {
        PhoneNumber::check("phone", raw)
    }

    pub fn check_email(raw: &str) -> String {
        EmailAddress::check("email", raw)
    }

    pub fn check_office_hours(raw: &str) -> String {
        OptionalString::check("officeHours", raw, &OFFICE_HOURS_RULES)
    }

    fn apply_inner(&mut self, slots: ShelterSlots) -> RecordResult<ShelterPatch> {
        let mut patch = ShelterPatch::default();

        let name = NonEmptyString::new("name", slots.name, &NAME_RULES)?;
        if name != self.name {
            self.name = name.clone();
            patch.name = Some(name);
        }

        let address = NonEmptyString::new("address", slots.address, &ADDRESS_RULES)?;
        if address != self.address {
            self.address = address.clone();
            patch.address = Some(address);
        }

        let phone = PhoneNumber::new("phone", slots.phone)?;
        if phone != self.phone {
            self.phone = phone.clone();
            patch.phone = Some(phone);
        }

        let email = EmailAddress::new("email", slots.email)?;
        if email != self.email {
            self.email = email.clone();
            patch.email = Some(email);
        }

        let office_hours = OptionalString::new("officeHours", slots.office_hours, &OFFICE_HOURS_RULES)?;
        if office_hours != self.office_hours {
            self.office_hours = office_hours.clone();
            patch.office_hours = Some(office_hours);
        }

        Ok(patch)
    }
}

/// Changed-field subset of a shelter update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShelterPatch {
    pub name: Option<NonEmptyString>,
    pub address: Option<NonEmptyString>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<EmailAddress>,
    pub office_hours: Option<OptionalString>,
}

impl PatchSet for ShelterPatch {
    fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.address.is_some() {
            fields.push("address");
        }
        if self.phone.is_some() {
            fields.push("phone");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.office_hours.is_some() {
            fields.push("officeHours");
        }
        fields
    }

    fn to_document(&self) -> Value {
        let mut document = serde_json::Map::new();
        if let Some(name) = &self.name {
            document.insert("name".into(), json!(name.as_str()));
        }
        if let Some(address) = &self.address {
            document.insert("address".into(), json!(address.as_str()));
        }
        if let Some(phone) = &self.phone {
            document.insert("phone".into(), json!(phone.as_str()));
        }
        if let Some(email) = &self.email {
            document.insert("email".into(), json!(email.as_str()));
        }
        if let Some(office_hours) = &self.office_hours {
            document.insert("officeHours".into(), json!(office_hours.as_str()));
        }
        Value::Object(document)
    }
}

impl Record for Shelter {
    type Slots = ShelterSlots;
    type Patch = ShelterPatch;
    const COLLECTION: &'static str = "shelters";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn document_from_slots(slots: &ShelterSlots) -> Value {
        serde_json::to_value(slots).unwrap_or(Value::Null)
    }

    fn slots_from_document(document: &Value) -> ValidationResult<ShelterSlots> {
        Ok(ShelterSlots {
            name: doc::string(document, "name")?,
            address: doc::string(document, "address")?,
            phone: doc::string(document, "phone")?,
            email: doc::string(document, "email")?,
            office_hours: doc::optional_string(document, "officeHours")?.unwrap_or_default(),
            creator_id: doc::optional_string(document, "creatorId")?,
        })
    }

    fn to_document(&self) -> Value {
        let mut document = json!({
            "name": self.name.as_str(),
            "address": self.address.as_str(),
            "phone": self.phone.as_str(),
            "email": self.email.as_str(),
            "officeHours": self.office_hours.as_str(),
        });
        if let Some(creator) = &self.creator_id {
            document["creatorId"] = json!(creator.as_str());
        }
        document
    }

    async fn from_slots<S: DocumentStore>(
        _backend: &S,
        id: RecordId,
        slots: ShelterSlots,
    ) -> RecordResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new("name", slots.name, &NAME_RULES)?,
            address: NonEmptyString::new("address", slots.address, &ADDRESS_RULES)?,
            phone: PhoneNumber::new("phone", slots.phone)?,
            email: EmailAddress::new("email", slots.email)?,
            office_hours: OptionalString::new("officeHours", slots.office_hours, &OFFICE_HOURS_RULES)?,
            creator_id: record::optional_record_id(&slots.creator_id)?,
        })
    }

    async fn apply<S: DocumentStore>(
        &mut self,
        _backend: &S,
        slots: ShelterSlots,
    ) -> RecordResult<ShelterPatch> {
        let snapshot = self.clone();
        match self.apply_inner(slots) {
            Ok(patch) => Ok(patch),
            Err(e) => {
                *self = snapshot;
                Err(e)
            }
        }
    }
}

impl fmt::Display for Shelter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shelter{{ id: {}, name: {}, address: {}, phone: {}, email: {} }}",
            self.id, self.name, self.address, self.phone, self.email
        )
    }
}
