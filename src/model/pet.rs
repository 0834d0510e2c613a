//! Pet record: an adoptable animal listed by a shelter.

use crate::error::{RecordResult, ValidationResult};
use crate::model::record::{self, PatchSet, Record, RecordId, doc};
use crate::model::shelter::Shelter;
use crate::model::value_objects::{
    DateInterval, IdReference, NonEmptyString, NumberInterval, PositiveNumber, SafeDate,
    StringRules,
};
use crate::storage::DocumentStore;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::sync::LazyLock;

const NAME_RULES: StringRules = StringRules::length(1, 120);
const WEIGHT_INTERVAL: NumberInterval = NumberInterval::at_most(500.0);

// Birth dates far in the past or future are data-entry mistakes.
static BIRTH_INTERVAL: LazyLock<DateInterval> = LazyLock::new(|| DateInterval {
    min: Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).single(),
    max: Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).single(),
});

macro_rules! field_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All labels, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Parse a label; anything outside the set is a violation.
            pub fn parse(raw: &str) -> ValidationResult<Self> {
                match raw {
                    $($label => Ok(Self::$variant),)+
                    other => Err(crate::error::ValidationError::NotInSet {
                        field: $field.to_string(),
                        value: other.to_string(),
                        allowed: Self::LABELS.iter().map(|s| s.to_string()).collect(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

field_enum!(
    /// Kind of animal a shelter lists.
    Species, "species", { Dog => "dog", Cat => "cat", Bird => "bird" }
);
field_enum!(
    /// Recorded sex of a pet.
    Sex, "sex", { Male => "male", Female => "female" }
);
field_enum!(
    /// Rough size class of a pet.
    Size, "size", { Small => "small", Medium => "medium", Large => "large" }
);

/// Plain slot record for constructing and updating a [`Pet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetSlots {
    pub name: String,
    pub species: String,
    pub sex: String,
    pub size: String,
    /// Weight in kilograms; form input, so `,` decimals are accepted.
    pub weight: String,
    pub birth_date: String,
    pub shelter_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
}

/// A validated pet listing.
///
/// The shelter reference is re-resolved against the backend on every
/// construction and every change of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    id: RecordId,
    name: NonEmptyString,
    species: Species,
    sex: Sex,
    size: Size,
    weight: PositiveNumber,
    birth_date: SafeDate,
    shelter_id: IdReference,
    creator_id: Option<RecordId>,
}

impl Pet {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn weight(&self) -> f64 {
        self.weight.value()
    }

    pub fn birth_date(&self) -> SafeDate {
        self.birth_date
    }

    pub fn shelter_id(&self) -> &IdReference {
        &self.shelter_id
    }

    pub fn creator_id(&self) -> Option<&str> {
        self.creator_id.as_ref().map(RecordId::as_str)
    }

    // Message-returning field validators for form code: "" means valid.

    pub fn check_name(raw: &str) -> String {
        NonEmptyString::check("name", raw, &NAME_RULES)
    }

    pub fn check_species(raw: &str) -> String {
        match Species::parse(raw) {
            Ok(_) => String::new(),
            Err(e) => e.message(),
        }
    }

    pub fn check_sex(raw: &str) -> String {
        match Sex::parse(raw) {
            Ok(_) => String::new(),
            Err(e) => e.message(),
        }
    }

    pub fn check_size(raw: &str) -> String {
        match Size::parse(raw) {
            Ok(_) => String::new(),
            Err(e) => e.message(),
        }
    }

    pub fn check_weight(raw: &str) -> String {
        PositiveNumber::check_float("weight", raw, &WEIGHT_INTERVAL)
    }

    pub fn check_birth_date(raw: &str) -> String {
        SafeDate::check("birthDate", raw, &BIRTH_INTERVAL)
    }

    pub async fn check_shelter_id<S: DocumentStore>(backend: &S, raw: &str) -> String {
        IdReference::check(backend, Shelter::COLLECTION, raw).await
    }

    async fn apply_inner<S: DocumentStore>(
        &mut self,
        backend: &S,
        slots: PetSlots,
    ) -> RecordResult<PetPatch> {
        let mut patch = PetPatch::default();

        let name = NonEmptyString::new("name", slots.name, &NAME_RULES)?;
        if name != self.name {
            self.name = name.clone();
            patch.name = Some(name);
        }

        let species = Species::parse(&slots.species)?;
        if species != self.species {
            self.species = species;
            patch.species = Some(species);
        }

        let sex = Sex::parse(&slots.sex)?;
        if sex != self.sex {
            self.sex = sex;
            patch.sex = Some(sex);
        }

        let size = Size::parse(&slots.size)?;
        if size != self.size {
            self.size = size;
            patch.size = Some(size);
        }

        let weight = PositiveNumber::parse_float("weight", &slots.weight, &WEIGHT_INTERVAL)?;
        if weight != self.weight {
            self.weight = weight;
            patch.weight = Some(weight);
        }

        let birth_date = SafeDate::parse("birthDate", &slots.birth_date, &BIRTH_INTERVAL)?;
        if birth_date != self.birth_date {
            self.birth_date = birth_date;
            patch.birth_date = Some(birth_date);
        }

        if slots.shelter_id != self.shelter_id.as_str() {
            let shelter_id =
                IdReference::resolve(backend, Shelter::COLLECTION, &slots.shelter_id).await?;
            self.shelter_id = shelter_id.clone();
            patch.shelter_id = Some(shelter_id);
        }

        // creator identity is fixed at creation and never diffed
        Ok(patch)
    }
}

/// Changed-field subset of a pet update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetPatch {
    pub name: Option<NonEmptyString>,
    pub species: Option<Species>,
    pub sex: Option<Sex>,
    pub size: Option<Size>,
    pub weight: Option<PositiveNumber>,
    pub birth_date: Option<SafeDate>,
    pub shelter_id: Option<IdReference>,
}

impl PatchSet for PetPatch {
    fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.species.is_some() {
            fields.push("species");
        }
        if self.sex.is_some() {
            fields.push("sex");
        }
        if self.size.is_some() {
            fields.push("size");
        }
        if self.weight.is_some() {
            fields.push("weight");
        }
        if self.birth_date.is_some() {
            fields.push("birthDate");
        }
        if self.shelter_id.is_some() {
            fields.push("shelterId");
        }
        fields
    }

    fn to_document(&self) -> Value {
        let mut document = serde_json::Map::new();
        if let Some(name) = &self.name {
            document.insert("name".into(), json!(name.as_str()));
        }
        if let Some(species) = &self.species {
            document.insert("species".into(), json!(species.as_str()));
        }
        if let Some(sex) = &self.sex {
            document.insert("sex".into(), json!(sex.as_str()));
        }
        if let Some(size) = &self.size {
            document.insert("size".into(), json!(size.as_str()));
        }
        if let Some(weight) = &self.weight {
            document.insert("weight".into(), json!(weight.value().to_string()));
        }
        if let Some(birth_date) = &self.birth_date {
            document.insert("birthDate".into(), json!(birth_date.to_rfc3339()));
        }
        if let Some(shelter_id) = &self.shelter_id {
            document.insert("shelterId".into(), json!(shelter_id.as_str()));
        }
        Value::Object(document)
    }
}

impl Record for Pet {
    type Slots = PetSlots;
    type Patch = PetPatch;
    const COLLECTION: &'static str = "pets";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn document_from_slots(slots: &PetSlots) -> Value {
        serde_json::to_value(slots).unwrap_or(Value::Null)
    }

    fn slots_from_document(document: &Value) -> ValidationResult<PetSlots> {
        Ok(PetSlots {
            name: doc::string(document, "name")?,
            species: doc::string(document, "species")?,
            sex: doc::string(document, "sex")?,
            size: doc::string(document, "size")?,
            weight: doc::string(document, "weight")?,
            birth_date: doc::string(document, "birthDate")?,
            shelter_id: doc::string(document, "shelterId")?,
            creator_id: doc::optional_string(document, "creatorId")?,
        })
    }

    fn to_document(&self) -> Value {
        let mut document = json!({
            "name": self.name.as_str(),
            "species": self.species.as_str(),
            "sex": self.sex.as_str(),
            "size": self.size.as_str(),
            "weight": self.weight.value().to_string(),
            "birthDate": self.birth_date.to_rfc3339(),
            "shelterId": self.shelter_id.as_str(),
        });
        if let Some(creator) = &self.creator_id {
            document["creatorId"] = json!(creator.as_str());
        }
        document
    }

    async fn from_slots<S: DocumentStore>(
        backend: &S,
        id: RecordId,
        slots: PetSlots,
    ) -> RecordResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new("name", slots.name, &NAME_RULES)?,
            species: Species::parse(&slots.species)?,
            sex: Sex::parse(&slots.sex)?,
            size: Size::parse(&slots.size)?,
            weight: PositiveNumber::parse_float("weight", &slots.weight, &WEIGHT_INTERVAL)?,
            birth_date: SafeDate::parse("birthDate", &slots.birth_date, &BIRTH_INTERVAL)?,
            shelter_id: IdReference::resolve(backend, Shelter::COLLECTION, &slots.shelter_id)
                .await?,
            creator_id: record::optional_record_id(&slots.creator_id)?,
        })
    }

    async fn apply<S: DocumentStore>(
        &mut self,
        backend: &S,
        slots: PetSlots,
    ) -> RecordResult<PetPatch> {
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

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pet{{ id: {}, name: {}, species: {}, sex: {}, size: {}, born: {}, shelter: {} }}",
            self.id, self.name, self.species, self.sex, self.size, self.birth_date, self.shelter_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RecordError, ValidationError};
    use crate::storage::InMemoryStore;
    use serde_json::json;

    fn slots(shelter_id: &str) -> PetSlots {
        PetSlots {
            name: "Rex".to_string(),
            species: "dog".to_string(),
            sex: "male".to_string(),
            size: "medium".to_string(),
            weight: "17,5".to_string(),
            birth_date: "2020-03-01".to_string(),
            shelter_id: shelter_id.to_string(),
            creator_id: Some("u1".to_string()),
        }
    }

    async fn backend_with_shelter() -> InMemoryStore {
        let backend = InMemoryStore::new();
        backend
            .put("shelters", "s1", json!({"name": "Pet Haven"}))
            .await
            .unwrap();
        backend
    }

    #[tokio::test]
    async fn test_construction() {
        let backend = backend_with_shelter().await;
        let pet = Pet::from_slots(&backend, RecordId::new("p1").unwrap(), slots("s1"))
            .await
            .unwrap();
        assert_eq!(pet.name(), "Rex");
        assert_eq!(pet.species(), Species::Dog);
        // comma decimal separator normalized at construction
        assert_eq!(pet.weight(), 17.5);
        assert_eq!(pet.shelter_id().as_str(), "s1");
        assert_eq!(pet.creator_id(), Some("u1"));
    }

    #[tokio::test]
    async fn test_construction_rejects_unknown_shelter() {
        let backend = InMemoryStore::new();
        let err = Pet::from_slots(&backend, RecordId::new("p1").unwrap(), slots("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Validation(ValidationError::UnknownReference { .. })
        ));
    }

    #[tokio::test]
    async fn test_construction_rejects_bad_species() {
        let backend = backend_with_shelter().await;
        let mut bad = slots("s1");
        bad.species = "hamster".to_string();
        let err = Pet::from_slots(&backend, RecordId::new("p1").unwrap(), bad)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Validation(ValidationError::NotInSet { .. })
        ));
    }

    #[tokio::test]
    async fn test_apply_returns_only_changed_fields() {
        let backend = backend_with_shelter().await;
        let mut pet = Pet::from_slots(&backend, RecordId::new("p1").unwrap(), slots("s1"))
            .await
            .unwrap();

        let mut updated = slots("s1");
        updated.name = "Rexo".to_string();
        updated.size = "large".to_string();
        let patch = pet.apply(&backend, updated).await.unwrap();

        assert_eq!(patch.changed_fields(), vec!["name", "size"]);
        assert_eq!(pet.name(), "Rexo");
        assert_eq!(pet.size(), Size::Large);
    }

    #[tokio::test]
    async fn test_apply_is_idempotent() {
        let backend = backend_with_shelter().await;
        let mut pet = Pet::from_slots(&backend, RecordId::new("p1").unwrap(), slots("s1"))
            .await
            .unwrap();

        let mut updated = slots("s1");
        updated.name = "Rexo".to_string();
        let first = pet.apply(&backend, updated.clone()).await.unwrap();
        assert!(!first.is_empty());

        let second = pet.apply(&backend, updated).await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_apply_rolls_back_on_failure() {
        let backend = backend_with_shelter().await;
        let mut pet = Pet::from_slots(&backend, RecordId::new("p1").unwrap(), slots("s1"))
            .await
            .unwrap();
        let before = pet.clone();

        // name change is valid but the species violation must undo it
        let mut bad = slots("s1");
        bad.name = "Bello".to_string();
        bad.species = "dragon".to_string();
        assert!(pet.apply(&backend, bad).await.is_err());
        assert_eq!(pet, before);
    }

    #[tokio::test]
    async fn test_document_round_trip() {
        let backend = backend_with_shelter().await;
        let pet = Pet::from_slots(&backend, RecordId::new("p1").unwrap(), slots("s1"))
            .await
            .unwrap();

        let reloaded_slots = Pet::slots_from_document(&pet.to_document()).unwrap();
        let reloaded = Pet::from_slots(&backend, RecordId::new("p1").unwrap(), reloaded_slots)
            .await
            .unwrap();
        assert_eq!(pet, reloaded);
    }

    #[tokio::test]
    async fn test_patch_document_holds_only_changes() {
        let backend = backend_with_shelter().await;
        let mut pet = Pet::from_slots(&backend, RecordId::new("p1").unwrap(), slots("s1"))
            .await
            .unwrap();

        let mut updated = slots("s1");
        updated.name = "Rexo".to_string();
        let patch = pet.apply(&backend, updated).await.unwrap();
        let document = patch.to_document();
        assert_eq!(document, json!({"name": "Rexo"}));
    }

    #[test]
    fn test_check_validators() {
        assert_eq!(Pet::check_name("Rex"), "");
        assert!(!Pet::check_name("").is_empty());
        assert_eq!(Pet::check_species("cat"), "");
        assert!(Pet::check_species("hamster").contains("species"));
        assert_eq!(Pet::check_birth_date("2020-03-01"), "");
        assert!(!Pet::check_birth_date("1970-13-99").is_empty());
        assert_eq!(Pet::check_weight("17,5"), "");
        assert!(Pet::check_weight("heavy").contains("weight"));
    }

    #[test]
    fn test_field_enum_labels() {
        assert_eq!(Species::Dog.as_str(), "dog");
        assert_eq!(Species::LABELS, &["dog", "cat", "bird"]);
        assert_eq!(Sex::parse("female").unwrap(), Sex::Female);
        assert!(Size::parse("gigantic").is_err());
    }
}
