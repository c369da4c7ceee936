//! The deployed site's content, assembled from static data.
//!
//! This is the one place page copy lives; the renderer and both validators
//! only ever see the resulting [`ContentModel`].

use crate::content::{AssetRef, ContentModel, FooterInfo, HoursBlock, HoursEntry, Section};
use crate::Result;

/// Build the Arturo Soto SA content model
pub fn arturo_soto() -> Result<ContentModel> {
    let sections = vec![
        Section::Header {
            id: "header".into(),
            cover: AssetRef {
                logical_name: "cover".into(),
                public_path: "/portada.jpg".into(),
                alt_text: "Arturo Soto SA".into(),
            },
        },
        Section::About {
            id: "about".into(),
            heading: "Sobre Nosotros".into(),
            body: "Arturo Soto SA es una empresa líder en la distribución mayorista de \
                   patatas y cebollas, con sede en Picassent, Valencia. Desde hace décadas \
                   seleccionamos el mejor producto de la huerta para servirlo a comercios y \
                   hostelería de toda la Comunidad Valenciana."
                .into(),
        },
        Section::Contact {
            id: "contact".into(),
            heading: "Contacto".into(),
            address_lines: vec![
                "Vía Camino, 51".into(),
                "46229 Picassent, Valencia".into(),
            ],
            phone: "961 27 28 55".into(),
            hours: HoursBlock {
                heading: "Horario Comercial".into(),
                entries: vec![HoursEntry {
                    label: "Lunes a Viernes".into(),
                    times: "7:00–14:00, 16:00–18:00".into(),
                }],
            },
        },
        Section::Map {
            id: "map".into(),
            heading: "Ubicación".into(),
            embed_url: "https://www.google.com/maps/embed?pb=!1m18!1m12!1m3!1d3084.8!2d-0.46!3d39.36!\
                        2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!3m3!1m2!1s0x0:0x0!2sArturo%20Soto%20SA!5e0"
                .into(),
            width: "100%".into(),
            height: "450".into(),
            lazy_load: true,
        },
        Section::Subsidies {
            id: "subsidies".into(),
            heading: "Subvenciones".into(),
            image: AssetRef {
                logical_name: "subsidy".into(),
                public_path: "/avalem.webp".into(),
                alt_text: "Programa de fomento de empleo subvencionado por LABORA y AVALEM".into(),
            },
            caption: "Programa de fomento de empleo subvencionado por LABORA y AVALEM".into(),
        },
    ];

    ContentModel::new(
        "Arturo Soto SA - Patatas y Cebollas",
        "es",
        sections,
        FooterInfo {
            copyright_year: 2024,
            owner_name: "Arturo Soto SA".into(),
            rights_notice: "Todos los derechos reservados".into(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_appear_in_page_order() {
        let model = arturo_soto().unwrap();
        let ids: Vec<&str> = model.sections.iter().map(|s| s.id()).collect();
        assert_eq!(ids, ["header", "about", "contact", "map", "subsidies"]);
    }

    #[test]
    fn every_asset_has_alt_text() {
        let model = arturo_soto().unwrap();
        for asset in model.assets() {
            assert!(!asset.alt_text.is_empty(), "{} missing alt", asset.logical_name);
        }
    }
}
