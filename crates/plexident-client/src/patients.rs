//! Patient endpoints. Same shape as the user endpoints, over
//! `/patients/`.

use plexident_core::Patient;

use crate::{ClientError, PatientCreate, PatientUpdate, PlexidentClient};

impl PlexidentClient {
    /// List all patients. `GET /patients/`.
    pub async fn list_patients(&self) -> Result<Vec<Patient>, ClientError> {
        self.get("/patients/").await
    }

    /// Fetch one patient by id. `GET /patients/{id}/`.
    pub async fn get_patient(&self, id: &str) -> Result<Patient, ClientError> {
        self.get(&format!("/patients/{}/", id)).await
    }

    /// Create a patient. `POST /patients/`.
    pub async fn create_patient(&self, patient: &PatientCreate) -> Result<Patient, ClientError> {
        self.post("/patients/", patient).await
    }

    /// Update a patient. `PUT /patients/{id}/`.
    pub async fn update_patient(
        &self,
        id: &str,
        patient: &PatientUpdate,
    ) -> Result<Patient, ClientError> {
        self.put(&format!("/patients/{}/", id), patient).await
    }

    /// Delete a patient. `DELETE /patients/{id}/`.
    pub async fn delete_patient(&self, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/patients/{}/", id)).await
    }
}
