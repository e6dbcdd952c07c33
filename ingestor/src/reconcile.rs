//! Batch-local merge of facility survey responses.
//!
//! The survey feed emits one response per (facility, service type). Reconciling
//! folds those into a single [`CanonicalFacility`] per facility id. Nothing
//! already persisted is consulted; each call starts from an empty batch.

use crate::error::UnknownServiceType;
use crate::models::CanonicalFacility;
use shared::opendata::survey::{
    EMERGENCY_LABEL, INPATIENT_LABEL, OUTPATIENT_LABEL, RawFacilityResponse,
};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ServiceType {
    Inpatient,
    Outpatient,
    Emergency,
}

impl TryFrom<&str> for ServiceType {
    type Error = UnknownServiceType;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            INPATIENT_LABEL => Ok(ServiceType::Inpatient),
            OUTPATIENT_LABEL => Ok(ServiceType::Outpatient),
            EMERGENCY_LABEL => Ok(ServiceType::Emergency),
            other => Err(UnknownServiceType(other.to_string())),
        }
    }
}

impl Display for ServiceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::Inpatient => write!(f, "Inpatient"),
            ServiceType::Outpatient => write!(f, "Outpatient"),
            ServiceType::Emergency => write!(f, "Emergency"),
        }
    }
}

impl ServiceType {
    fn apply(self, facility: &mut CanonicalFacility, answer: &str) {
        let field = match self {
            ServiceType::Inpatient => &mut facility.hospitalization,
            ServiceType::Outpatient => &mut facility.outpatient,
            ServiceType::Emergency => &mut facility.emergency,
        };
        *field = Some(answer.to_string());
    }
}

/// Canonical facilities keyed by facility id, iterated in first-seen order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconciledBatch {
    facilities: Vec<CanonicalFacility>,
    index: HashMap<String, usize>,
}

impl ReconciledBatch {
    pub fn get(&self, facility_id: &str) -> Option<&CanonicalFacility> {
        self.index.get(facility_id).map(|&i| &self.facilities[i])
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalFacility> {
        self.facilities.iter()
    }

    pub fn into_vec(self) -> Vec<CanonicalFacility> {
        self.facilities
    }

    fn entry(&mut self, response: &RawFacilityResponse) -> &mut CanonicalFacility {
        let i = match self.index.get(&response.facility_id) {
            Some(&i) => i,
            None => {
                trace!(facility_id = response.facility_id, "first response for facility");
                self.facilities.push(CanonicalFacility::new(
                    response.facility_id.clone(),
                    response.details.clone(),
                ));
                let i = self.facilities.len() - 1;
                self.index.insert(response.facility_id.clone(), i);
                i
            }
        };
        &mut self.facilities[i]
    }
}

/// Merges raw responses into one canonical record per facility id.
///
/// Descriptive fields come from the first response seen for an id. A repeated
/// service type for the same id overwrites the earlier answer, so input order
/// decides ties. Any service type outside the closed set aborts the whole call.
pub fn reconcile(responses: &[RawFacilityResponse]) -> Result<ReconciledBatch, UnknownServiceType> {
    let mut batch = ReconciledBatch::default();
    for response in responses {
        let service_type = ServiceType::try_from(response.service_type.as_str())?;
        trace!(
            facility_id = response.facility_id,
            service_type = %service_type,
            "applying survey answer"
        );
        service_type.apply(batch.entry(response), &response.answer);
    }
    Ok(batch)
}
