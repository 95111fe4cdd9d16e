use chrono::NaiveDate;
use tracing::{debug, warn};

use shared_models::error::ApiError;
use shared_models::remote::RemoteData;

use crate::calendar;
use crate::models::{
    BookingConfirmation, BookingRequest, ConsultationType, ContactInfo, Location, Slot,
    SlotQueryParams, WizardError,
};
use crate::services::provider::AgendaProvider;

/// Position in the booking flow. A single tagged union instead of the
/// per-form booleans the flow accumulated over time.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    SelectType,
    SelectLocation,
    SelectDate,
    SelectSlot,
    EnterDetails,
    Submitting,
    Success(BookingConfirmation),
    Failed(String),
}

/// Client-side accumulated, unvalidated booking state prior to submission.
/// A step's datum is only accepted once all prior steps are filled.
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    pub consultation_type: Option<ConsultationType>,
    pub location: Option<Location>,
    pub date: Option<NaiveDate>,
    pub slot: Option<Slot>,
    pub contact: Option<ContactInfo>,
    pub notes: Option<String>,
}

/// Handle for one availability fetch. The caller performs the request and
/// hands the outcome back through [`BookingWizard::apply_slots`]; responses
/// for superseded sequence numbers are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotQuery {
    pub seq: u64,
    pub params: SlotQueryParams,
}

/// The booking flow consolidated into one state machine, parameterized by
/// an injected [`AgendaProvider`] (authenticated or public).
pub struct BookingWizard {
    nutricionista_id: i64,
    today: NaiveDate,
    step: WizardStep,
    draft: BookingDraft,
    slots: RemoteData<Vec<Slot>>,
    fetch_seq: u64,
    notice: Option<String>,
}

impl BookingWizard {
    /// `today` anchors the past-date guard; pass the current local date.
    pub fn new(nutricionista_id: i64, today: NaiveDate) -> Self {
        Self {
            nutricionista_id,
            today,
            step: WizardStep::SelectType,
            draft: BookingDraft::default(),
            slots: RemoteData::Idle,
            fetch_seq: 0,
            notice: None,
        }
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn slots(&self) -> &RemoteData<Vec<Slot>> {
        &self.slots
    }

    /// Server message retained for display after a rejected submit.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn nutricionista_id(&self) -> i64 {
        self.nutricionista_id
    }

    /// Choose the consultation kind. Invalidates the location and slot:
    /// availability depends jointly on type, location and duration.
    pub fn select_type(&mut self, consultation_type: ConsultationType) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitting {
            return Err(WizardError::AlreadySubmitting);
        }
        debug!("Consultation type selected: {}", consultation_type.label);
        self.draft.consultation_type = Some(consultation_type);
        self.draft.location = None;
        self.draft.slot = None;
        self.draft.contact = None;
        self.slots = RemoteData::Idle;
        self.fetch_seq += 1;
        self.step = WizardStep::SelectLocation;
        Ok(())
    }

    /// Choose the location. If a date was already picked the availability
    /// fetch is re-issued for the new parameters.
    pub fn select_location(
        &mut self,
        location: Location,
    ) -> Result<Option<SlotQuery>, WizardError> {
        if self.step == WizardStep::Submitting {
            return Err(WizardError::AlreadySubmitting);
        }
        if self.draft.consultation_type.is_none() {
            return Err(WizardError::OutOfOrder("consultation type"));
        }
        debug!("Location selected: {}", location.name);
        self.draft.location = Some(location);
        self.draft.slot = None;

        match self.draft.date {
            Some(date) => {
                let query = self.issue_query(date);
                self.step = WizardStep::SelectSlot;
                Ok(Some(query))
            }
            None => {
                self.step = WizardStep::SelectDate;
                Ok(None)
            }
        }
    }

    /// Choose the day. Weekend and past dates are rejected client-side as
    /// defense in depth; the server stays the authority. Returns the
    /// availability query to run for `[start_of_day, end_of_day]`.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<SlotQuery, WizardError> {
        if self.step == WizardStep::Submitting {
            return Err(WizardError::AlreadySubmitting);
        }
        if self.draft.consultation_type.is_none() {
            return Err(WizardError::OutOfOrder("consultation type"));
        }
        if self.draft.location.is_none() {
            return Err(WizardError::OutOfOrder("location"));
        }
        if !calendar::is_selectable(date, self.today) {
            return Err(WizardError::DateNotSelectable(date));
        }

        debug!("Date selected: {}", date);
        self.draft.date = Some(date);
        self.draft.slot = None;
        let query = self.issue_query(date);
        self.step = WizardStep::SelectSlot;
        Ok(query)
    }

    /// Apply the outcome of an availability fetch. Returns false when the
    /// response belongs to a superseded query and was discarded; a stale
    /// slot list must never overwrite a newer one.
    pub fn apply_slots(&mut self, seq: u64, result: Result<Vec<Slot>, ApiError>) -> bool {
        if seq != self.fetch_seq {
            warn!(
                "Discarding stale slot response (seq {} != current {})",
                seq, self.fetch_seq
            );
            return false;
        }
        self.slots = RemoteData::from_result(result);
        true
    }

    /// Pick one of the offered slots. Only slots present in the latest
    /// fetched set are accepted.
    pub fn select_slot(&mut self, slot: Slot) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitting {
            return Err(WizardError::AlreadySubmitting);
        }
        if self.draft.date.is_none() {
            return Err(WizardError::OutOfOrder("date"));
        }
        let offered = self
            .slots
            .succeeded()
            .map(|slots| slots.contains(&slot))
            .unwrap_or(false);
        if !offered {
            return Err(WizardError::SlotNotOffered);
        }

        debug!("Slot selected: {}", slot);
        self.draft.slot = Some(slot);
        self.step = WizardStep::EnterDetails;
        Ok(())
    }

    pub fn enter_details(&mut self, contact: ContactInfo) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitting {
            return Err(WizardError::AlreadySubmitting);
        }
        if self.draft.slot.is_none() {
            return Err(WizardError::OutOfOrder("slot"));
        }
        if !contact.is_valid() {
            return Err(WizardError::MissingContact);
        }
        self.draft.contact = Some(contact);
        self.step = WizardStep::EnterDetails;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.draft.notes = notes;
    }

    /// Convert the completed draft into the submit payload and enter
    /// `Submitting`. Yields the request exactly once: while a submission is
    /// in flight further calls are rejected, which is what keeps a
    /// double-click from issuing two bookings.
    pub fn begin_submit(&mut self) -> Result<BookingRequest, WizardError> {
        if self.step == WizardStep::Submitting {
            return Err(WizardError::AlreadySubmitting);
        }

        let consultation_type = self
            .draft
            .consultation_type
            .as_ref()
            .ok_or(WizardError::OutOfOrder("consultation type"))?;
        let location = self
            .draft
            .location
            .as_ref()
            .ok_or(WizardError::OutOfOrder("location"))?;
        let slot = self.draft.slot.as_ref().ok_or(WizardError::OutOfOrder("slot"))?;
        let contact = self
            .draft
            .contact
            .as_ref()
            .ok_or(WizardError::MissingContact)?;

        let request = BookingRequest {
            nutricionista: self.nutricionista_id,
            ubicacion: location.id,
            tipo_consulta: consultation_type.id,
            appointment_date: slot.date(),
            appointment_time: slot.start_label(),
            duration_minutes: consultation_type.duration_minutes,
            start_time: slot.start,
            end_time: slot.end,
            nombre_completo: contact.full_name.clone(),
            email: contact.email.clone(),
            telefono: contact.phone.clone().unwrap_or_default(),
            notas_paciente: self.draft.notes.clone(),
        };

        self.notice = None;
        self.step = WizardStep::Submitting;
        Ok(request)
    }

    /// Feed the submission outcome back into the machine.
    ///
    /// A domain rejection (lead-time policy, slot taken between fetch and
    /// submit) returns the user to slot selection with the server's message
    /// verbatim and re-issues the availability fetch so a now-stale slot
    /// cannot be re-picked. Type, location and date are preserved.
    pub fn complete_submit(
        &mut self,
        outcome: Result<BookingConfirmation, ApiError>,
    ) -> Option<SlotQuery> {
        match outcome {
            Ok(confirmation) => {
                self.step = WizardStep::Success(confirmation);
                None
            }
            Err(ApiError::Domain(message)) => {
                warn!("Booking rejected by server: {}", message);
                self.notice = Some(message);
                self.draft.slot = None;
                self.step = WizardStep::SelectSlot;
                match self.draft.date {
                    Some(date) => Some(self.issue_query(date)),
                    None => None,
                }
            }
            Err(other) => {
                self.step = WizardStep::Failed(other.user_message());
                None
            }
        }
    }

    /// Back to the details step after a non-domain failure; the draft is
    /// kept so the user can retry manually.
    pub fn retry(&mut self) {
        if matches!(self.step, WizardStep::Failed(_)) {
            self.step = WizardStep::EnterDetails;
        }
    }

    /// Discard the draft entirely.
    pub fn cancel(&mut self) {
        debug!("Wizard cancelled, draft discarded");
        self.draft = BookingDraft::default();
        self.slots = RemoteData::Idle;
        self.notice = None;
        self.fetch_seq += 1;
        self.step = WizardStep::SelectType;
    }

    /// Run a slot query to completion against the provider. Convenience for
    /// sequential drivers; concurrent callers go through `apply_slots` and
    /// rely on the sequence guard.
    pub async fn load_slots(
        &mut self,
        provider: &dyn AgendaProvider,
        query: SlotQuery,
    ) -> bool {
        let result = provider.available_slots(&query.params).await;
        self.apply_slots(query.seq, result)
    }

    fn issue_query(&mut self, date: NaiveDate) -> SlotQuery {
        self.fetch_seq += 1;
        self.slots = RemoteData::Pending;
        // Stale-slot display is a correctness bug: never reuse a previous
        // fetch across a type/location/date change.
        let params = SlotQueryParams {
            nutricionista_id: self.nutricionista_id,
            ubicacion_id: self.draft.location.as_ref().map(|l| l.id).unwrap_or_default(),
            tipo_consulta_id: self
                .draft
                .consultation_type
                .as_ref()
                .map(|t| t.id)
                .unwrap_or_default(),
            duration_minutes: self
                .draft
                .consultation_type
                .as_ref()
                .map(|t| t.duration_minutes)
                .unwrap_or_default(),
            fecha_inicio: date,
            fecha_fin: date,
        };
        SlotQuery {
            seq: self.fetch_seq,
            params,
        }
    }
}
