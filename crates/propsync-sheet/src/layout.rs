//! Position-addressed column layout of each collection.
//!
//! Column letters follow the source workbook: A is index 0.

use std::fmt;

use crate::records::{AdminRecord, GroupRecord, RemoteIds, SiteRecord};

/// The three collections of a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Sites,
    Admins,
    Groups,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 3] = [Self::Sites, Self::Admins, Self::Groups];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sites => "Sites",
            Self::Admins => "Admins",
            Self::Groups => "Groups",
        }
    }

    /// File name used by the CSV store.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conversion between a raw row and a typed record.
pub trait RowLayout: Sized {
    const KIND: CollectionKind;
    /// Header written when a collection has none.
    const HEADERS: &'static [&'static str];

    /// Decode the cells of 1-based row `row`.
    fn decode(row: usize, cells: &[String]) -> Self;

    /// Encode back to cells, mapped columns first then preserved extras.
    fn encode(&self) -> Vec<String>;

    /// Key used to identify the record; rows with an empty key are ignored.
    fn key(&self) -> &str;
}

fn cell(cells: &[String], idx: usize) -> String {
    cells.get(idx).cloned().unwrap_or_default()
}

fn optional(cells: &[String], idx: usize) -> Option<String> {
    cells.get(idx).filter(|c| !c.is_empty()).cloned()
}

fn ids(cells: &[String]) -> RemoteIds {
    RemoteIds {
        production: optional(cells, 1),
        non_production: optional(cells, 2),
    }
}

fn extra(cells: &[String], width: usize) -> Vec<String> {
    cells.get(width..).map(<[String]>::to_vec).unwrap_or_default()
}

fn id_cells(ids: &RemoteIds) -> [String; 2] {
    [
        ids.production.clone().unwrap_or_default(),
        ids.non_production.clone().unwrap_or_default(),
    ]
}

impl RowLayout for SiteRecord {
    const KIND: CollectionKind = CollectionKind::Sites;
    const HEADERS: &'static [&'static str] = &[
        "Label",
        "Production ID",
        "Non-Production ID",
        "Name",
        "Address 1",
        "Address 2",
        "City",
        "Country",
        "Language",
        "Postal Code",
        "State",
        "Timezone",
        "Latitude",
        "Longitude",
    ];

    fn decode(row: usize, cells: &[String]) -> Self {
        Self {
            row,
            label: cell(cells, 0),
            ids: ids(cells),
            name: cell(cells, 3),
            address1: cell(cells, 4),
            address2: optional(cells, 5),
            city: cell(cells, 6),
            country: cell(cells, 7),
            language: cell(cells, 8),
            postal_code: cell(cells, 9),
            state: cell(cells, 10),
            timezone: cell(cells, 11),
            latitude: optional(cells, 12),
            longitude: optional(cells, 13),
            extra: extra(cells, Self::HEADERS.len()),
        }
    }

    fn encode(&self) -> Vec<String> {
        let [prod, np] = id_cells(&self.ids);
        let mut out = vec![
            self.label.clone(),
            prod,
            np,
            self.name.clone(),
            self.address1.clone(),
            self.address2.clone().unwrap_or_default(),
            self.city.clone(),
            self.country.clone(),
            self.language.clone(),
            self.postal_code.clone(),
            self.state.clone(),
            self.timezone.clone(),
            self.latitude.clone().unwrap_or_default(),
            self.longitude.clone().unwrap_or_default(),
        ];
        out.extend(self.extra.iter().cloned());
        out
    }

    fn key(&self) -> &str {
        &self.name
    }
}

impl RowLayout for AdminRecord {
    const KIND: CollectionKind = CollectionKind::Admins;
    const HEADERS: &'static [&'static str] = &[
        "Property Value",
        "Production ID",
        "Non-Production ID",
        "Target Name",
        "First Name",
        "Last Name",
        "Roles",
        "Site",
        "Email",
    ];

    fn decode(row: usize, cells: &[String]) -> Self {
        Self {
            row,
            property_value: cell(cells, 0),
            ids: ids(cells),
            target_name: cell(cells, 3),
            first_name: cell(cells, 4),
            last_name: cell(cells, 5),
            roles: AdminRecord::parse_roles(&cell(cells, 6)),
            site_name: cell(cells, 7),
            email: cell(cells, 8),
            extra: extra(cells, Self::HEADERS.len()),
        }
    }

    fn encode(&self) -> Vec<String> {
        let [prod, np] = id_cells(&self.ids);
        let mut out = vec![
            self.property_value.clone(),
            prod,
            np,
            self.target_name.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.roles_cell(),
            self.site_name.clone(),
            self.email.clone(),
        ];
        out.extend(self.extra.iter().cloned());
        out
    }

    fn key(&self) -> &str {
        &self.target_name
    }
}

impl RowLayout for GroupRecord {
    const KIND: CollectionKind = CollectionKind::Groups;
    const HEADERS: &'static [&'static str] = &[
        "Label",
        "Production ID",
        "Non-Production ID",
        "Target Name",
        "Site",
    ];

    fn decode(row: usize, cells: &[String]) -> Self {
        Self {
            row,
            label: cell(cells, 0),
            ids: ids(cells),
            target_name: cell(cells, 3),
            site_name: cell(cells, 4),
            extra: extra(cells, Self::HEADERS.len()),
        }
    }

    fn encode(&self) -> Vec<String> {
        let [prod, np] = id_cells(&self.ids);
        let mut out = vec![
            self.label.clone(),
            prod,
            np,
            self.target_name.clone(),
            self.site_name.clone(),
        ];
        out.extend(self.extra.iter().cloned());
        out
    }

    fn key(&self) -> &str {
        &self.target_name
    }
}
