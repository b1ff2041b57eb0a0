use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::villas::dtos::{CreateVillaDto, UpdateVillaDto, VillaDto};
use crate::features::villas::models::{NewVilla, Villa};
use crate::features::villas::patch::{JsonPatchDocument, PatchOperation};
use crate::features::villas::repository::{VillaFilter, VillaStore};
use crate::shared::constants::VILLA_ALREADY_EXISTS;
use crate::shared::validation::ModelState;

/// Service for villa operations
pub struct VillaService {
    store: Arc<dyn VillaStore>,
}

impl std::fmt::Debug for VillaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VillaService")
            .field("store", &"<VillaStore>")
            .finish()
    }
}

/// Reject non-positive identifiers before touching storage
fn ensure_valid_id(id: i32) -> Result<()> {
    if id <= 0 {
        return Err(AppError::BadRequest(format!("Invalid villa id {}", id)));
    }
    Ok(())
}

impl VillaService {
    pub fn new(store: Arc<dyn VillaStore>) -> Self {
        Self { store }
    }

    /// List every villa
    pub async fn list(&self) -> Result<Vec<VillaDto>> {
        let villas = self.store.scope().get_all().await?;
        Ok(villas.into_iter().map(VillaDto::from).collect())
    }

    /// Get villa by id
    pub async fn get(&self, id: i32) -> Result<VillaDto> {
        ensure_valid_id(id)?;

        self.store
            .scope()
            .get(&VillaFilter::Id(id), true)
            .await?
            .map(VillaDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Villa with id {} not found", id)))
    }

    /// Create a villa. A missing body is only reported after the duplicate check.
    pub async fn create(&self, dto: Option<CreateVillaDto>) -> Result<VillaDto> {
        let mut repo = self.store.scope();

        if let Some(ref dto) = dto {
            dto.validate()?;

            let existing = repo
                .get(&VillaFilter::NameIgnoreCase(dto.name.clone()), false)
                .await?;
            if existing.is_some() {
                let mut state = ModelState::default();
                state.add_model_error("", VILLA_ALREADY_EXISTS);
                return Err(state.into());
            }
        }

        let dto = dto.ok_or_else(|| AppError::BadRequest("Villa body is required".to_string()))?;

        let villa = repo.create(NewVilla::from(dto)).await?;
        Ok(villa.into())
    }

    /// Delete villa by id
    pub async fn delete(&self, id: i32) -> Result<()> {
        ensure_valid_id(id)?;

        let mut repo = self.store.scope();
        let villa = repo
            .get(&VillaFilter::Id(id), true)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Villa with id {} not found", id)))?;

        repo.remove(villa).await?;
        tracing::info!("Villa deleted: id={}", id);
        Ok(())
    }

    /// Replace a villa. No existence check, a missing row is left to the store.
    pub async fn update(&self, id: i32, dto: Option<UpdateVillaDto>) -> Result<()> {
        ensure_valid_id(id)?;

        let dto = match dto {
            Some(dto) if dto.id == id => dto,
            Some(dto) => {
                return Err(AppError::BadRequest(format!(
                    "Villa id {} does not match path id {}",
                    dto.id, id
                )))
            }
            None => return Err(AppError::BadRequest("Villa body is required".to_string())),
        };
        dto.validate()?;

        let mut repo = self.store.scope();
        repo.update(Villa::from(dto)).await?;
        repo.save().await?;
        Ok(())
    }

    /// Apply a JSON Patch to a villa.
    ///
    /// The patched villa is written even when operations failed; the
    /// accumulated errors are reported afterwards.
    pub async fn patch(&self, id: i32, operations: Option<Vec<PatchOperation>>) -> Result<()> {
        let operations = match operations {
            Some(operations) if id > 0 => operations,
            Some(_) => return ensure_valid_id(id),
            None => {
                return Err(AppError::BadRequest(
                    "Patch document is required".to_string(),
                ))
            }
        };
        let document = JsonPatchDocument::<UpdateVillaDto>::new(operations);

        let mut repo = self.store.scope();
        let villa = repo.get(&VillaFilter::Id(id), false).await?;
        let Some(villa) = villa else {
            return Err(AppError::BadRequest(format!(
                "Villa with id {} does not exist",
                id
            )));
        };

        let mut dto = UpdateVillaDto::from(villa);
        let mut state = ModelState::default();
        document.apply_to(&mut dto, &mut state);
        tracing::debug!(
            "Applied {} patch operations to villa {} ({} failed)",
            document.operations().len(),
            id,
            state.errors().len()
        );

        if dto.id != id {
            state.add_model_error("id", "The villa id cannot be changed");
            dto.id = id;
        }
        if let Err(errors) = dto.validate() {
            state.merge(errors.into());
        }

        repo.update(Villa::from(dto)).await?;
        repo.save().await?;

        if !state.is_valid() {
            return Err(state.into());
        }
        Ok(())
    }
}
