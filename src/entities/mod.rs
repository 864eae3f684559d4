// Entity Models - toxic plant reference data
//
// Each entity maps one table. Association attributes (severity, priority,
// concentration notes) live on the row types returned by the join queries.
//
// Read paths never mutate; writes happen only through `crate::import`.

pub mod plant;
pub mod source;
pub mod symptom;
pub mod toxic_part;
pub mod toxin;
pub mod treatment;

pub use plant::{find_plant, list_plants, Plant};
pub use source::{sources_for_plant, Source};
pub use symptom::{
    list_symptoms, normalize_body_system, plants_for_symptom, symptoms_for_plant, PlantSymptom,
    Symptom, SymptomPlant,
};
pub use toxic_part::toxic_part_names_for_plant;
pub use toxin::{list_toxins, plants_for_toxin, toxins_for_plant, PlantToxin, Toxin, ToxinPlant};
pub use treatment::{treatments_for_plant, PlantTreatment};
