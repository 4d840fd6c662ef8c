use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    #[default]
    #[serde(alias = "PENDIENTE")]
    Pending,
    #[serde(alias = "CONFIRMADA")]
    Confirmed,
    #[serde(alias = "EN_PROCESO")]
    InProgress,
    #[serde(alias = "COMPLETADA")]
    Completed,
    #[serde(alias = "CANCELADA")]
    Cancelled,
}

// Aliases accept the reservation service's own field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: u64,
    #[serde(alias = "fechaHora", default)]
    pub start: Option<NaiveDateTime>,
    #[serde(alias = "duracionMinutos", default)]
    pub duration_minutes: Option<u32>,
    #[serde(alias = "numeroPersonas", default, deserialize_with = "null_as_default")]
    pub occupants: u32,
    #[serde(alias = "kartsIds", default, deserialize_with = "null_as_default")]
    pub kart_ids: Vec<u64>,
    #[serde(alias = "clientesIds", default, deserialize_with = "null_as_default")]
    pub customer_ids: Vec<u64>,
    #[serde(alias = "precioTotal", default, deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(alias = "estado", default, deserialize_with = "null_as_default")]
    pub status: ReservationStatus,
    #[serde(alias = "observaciones", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Reservation {
    pub fn date(&self) -> Option<NaiveDate> {
        self.start.map(|start| start.date())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Day key -> block label -> reservations, as bucketed by the rack service.
pub type DayBuckets = BTreeMap<String, BTreeMap<String, Vec<Reservation>>>;

#[derive(Debug, Clone, PartialEq)]
pub enum WindowPayload {
    Flat(Vec<Reservation>),
    Bucketed(DayBuckets),
}

impl WindowPayload {
    /// Every reservation in the payload, de-duplicated by id in first-seen order.
    pub fn into_reservations(self) -> Vec<Reservation> {
        match self {
            WindowPayload::Flat(reservations) => reservations,
            WindowPayload::Bucketed(days) => {
                let mut seen = std::collections::HashSet::new();
                days.into_values()
                    .flat_map(BTreeMap::into_values)
                    .flatten()
                    .filter(|reservation| seen.insert(reservation.id))
                    .collect()
            }
        }
    }
}

// Totals are only taken from a rack response when both are present.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedWindow {
    pub payload: WindowPayload,
    pub statistics: Option<ServerStatistics>,
}

impl From<WindowPayload> for FetchedWindow {
    fn from(payload: WindowPayload) -> Self {
        Self {
            payload,
            statistics: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawWindowPayload {
    Flat(Vec<Reservation>),
    Wrapped {
        #[serde(rename = "rackSemanal", alias = "rack")]
        rack: DayBuckets,
        #[serde(default, rename = "totalReservas", alias = "totalReservations")]
        total_reservations: Option<u64>,
        #[serde(default, rename = "porcentajeOcupacion", alias = "utilizationPercent")]
        utilization_percent: Option<f64>,
    },
    Bare(DayBuckets),
}

impl From<RawWindowPayload> for FetchedWindow {
    fn from(raw: RawWindowPayload) -> Self {
        match raw {
            RawWindowPayload::Flat(reservations) => WindowPayload::Flat(reservations).into(),
            RawWindowPayload::Bare(rack) => WindowPayload::Bucketed(rack).into(),
            RawWindowPayload::Wrapped {
                rack,
                total_reservations,
                utilization_percent,
            } => Self {
                payload: WindowPayload::Bucketed(rack),
                statistics: total_reservations.zip(utilization_percent).map(
                    |(total_reservations, utilization_percent)| ServerStatistics {
                        total_reservations,
                        utilization_percent,
                    },
                ),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatistics {
    #[serde(alias = "totalReservas")]
    pub total_reservations: u64,
    #[serde(alias = "porcentajeOcupacion")]
    pub utilization_percent: f64,
}

#[derive(Debug, Deserialize)]
pub struct SelectWeekRequest {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub block: String,
    pub people: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    pub date: String,
    pub block: String,
    pub people: u32,
    pub occupied: u32,
    pub capacity: u32,
    pub reservations_in_block: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}
