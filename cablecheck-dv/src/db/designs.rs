//! Cable design record storage
//!
//! Read side of the record-identifier input path, plus a seeding helper used
//! by tests and operator tooling. Records come back as the open field-set
//! shape; identity columns are included and stripped later by the payload
//! normalizer.

use cablecheck_common::{DesignFields, Result};
use serde_json::json;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

/// New record for seeding; technical columns are all optional
#[derive(Debug, Clone, Default)]
pub struct NewDesign {
    pub design_id: String,
    pub standard: Option<String>,
    pub voltage: Option<String>,
    pub conductor_material: Option<String>,
    pub conductor_class: Option<String>,
    pub csa: Option<f64>,
    pub insulation_material: Option<String>,
    pub insulation_thickness: Option<f64>,
}

/// Look up a stored design by its public identifier.
///
/// **Returns:** Some(field set) including identity keys, None when no record
/// matches. Technical columns that are NULL in the row are omitted from the
/// field set rather than carried as nulls.
pub async fn fetch_design(db: &Pool<Sqlite>, design_id: &str) -> Result<Option<DesignFields>> {
    let row = sqlx::query_as::<
        _,
        (
            String,
            String,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<f64>,
            Option<String>,
            Option<f64>,
        ),
    >(
        r#"
        SELECT id, design_id, standard, voltage, conductor_material,
               conductor_class, csa, insulation_material, insulation_thickness
        FROM cable_designs
        WHERE design_id = ?
        "#,
    )
    .bind(design_id)
    .fetch_optional(db)
    .await?;

    let Some((
        id,
        design_id,
        standard,
        voltage,
        conductor_material,
        conductor_class,
        csa,
        insulation_material,
        insulation_thickness,
    )) = row
    else {
        return Ok(None);
    };

    let mut fields = DesignFields::new();
    fields.insert("id".to_string(), json!(id));
    fields.insert("design_id".to_string(), json!(design_id));

    if let Some(value) = standard {
        fields.insert("standard".to_string(), json!(value));
    }
    if let Some(value) = voltage {
        fields.insert("voltage".to_string(), json!(value));
    }
    if let Some(value) = conductor_material {
        fields.insert("conductor_material".to_string(), json!(value));
    }
    if let Some(value) = conductor_class {
        fields.insert("conductor_class".to_string(), json!(value));
    }
    if let Some(value) = csa {
        fields.insert("csa".to_string(), json!(value));
    }
    if let Some(value) = insulation_material {
        fields.insert("insulation_material".to_string(), json!(value));
    }
    if let Some(value) = insulation_thickness {
        fields.insert("insulation_thickness".to_string(), json!(value));
    }

    Ok(Some(fields))
}

/// Insert a design record, returning the generated internal id
pub async fn insert_design(db: &Pool<Sqlite>, design: &NewDesign) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO cable_designs
            (id, design_id, standard, voltage, conductor_material,
             conductor_class, csa, insulation_material, insulation_thickness, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&design.design_id)
    .bind(&design.standard)
    .bind(&design.voltage)
    .bind(&design.conductor_material)
    .bind(&design.conductor_class)
    .bind(design.csa)
    .bind(&design.insulation_material)
    .bind(design.insulation_thickness)
    .bind(&created_at)
    .execute(db)
    .await?;

    Ok(id)
}
