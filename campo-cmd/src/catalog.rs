//! `catalog`: crops and places as CSV.

use crate::connect::connect;
use crate::{csv_writer, Connection};
use campo_core::catalog::Catalog;
use campo_core::level::Level;
use log::info;
use serde::Serialize;

#[derive(Debug, PartialEq, Serialize)]
pub struct CatalogRow {
    pub tipo: &'static str,
    pub id: String,
    pub nombre: String,
}

/// One row per crop, then one per place of each level.
pub fn catalog_rows(catalog: &Catalog) -> Vec<CatalogRow> {
    let crops = catalog.crops.iter().map(|crop| CatalogRow {
        tipo: "cultivo",
        id: crop.id.clone(),
        nombre: crop.name.clone(),
    });
    let places = Level::ALL.into_iter().flat_map(|level| {
        catalog.places(level).iter().map(move |place| CatalogRow {
            tipo: level.as_str(),
            id: place.id.clone(),
            nombre: place.name.clone(),
        })
    });
    crops.chain(places).collect()
}

pub async fn run_catalog(connection: &Connection, output: Option<&str>) -> anyhow::Result<()> {
    let (client, session) = connect(connection).await?;
    let catalog = client.load_catalog(&session).await?;
    let rows = catalog_rows(&catalog);

    let mut writer = csv_writer(output)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} catalog rows", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campo_core::catalog::{Crop, Place};

    #[test]
    fn test_catalog_rows_order() {
        let mut catalog = Catalog {
            crops: vec![Crop { id: "1".into(), name: "Soja".into() }],
            ..Default::default()
        };
        catalog.set_places(
            Level::Province,
            vec![Place { id: "6".into(), name: "Buenos Aires".into() }],
        );
        let rows = catalog_rows(&catalog);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tipo, "cultivo");
        assert_eq!(rows[1].tipo, "provincia");
        assert_eq!(rows[1].nombre, "Buenos Aires");
    }
}
