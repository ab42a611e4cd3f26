use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::user_dto::CreateUserRequest;
use crate::dto::ApiResponse;
use crate::models::user::{User, UserRole};
use crate::repositories::UserRepository;
use crate::services::AuthService;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct UserController {
    users: Arc<dyn UserRepository>,
    auth: Arc<AuthService>,
}

impl UserController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.users.clone(),
            auth: state.auth.clone(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    pub async fn create(&self, request: CreateUserRequest) -> AppResult<ApiResponse<User>> {
        request.validate()?;
        let user = self
            .auth
            .create_user(&request.email, &request.password, &request.display_name, request.role)
            .await?;
        Ok(ApiResponse::success_with_message(user, "Usuario creado exitosamente"))
    }

    /// Activa/desactiva un usuario; un admin no puede desactivarse a sí mismo
    pub async fn set_active(&self, actor_id: Uuid, id: Uuid, active: bool) -> AppResult<ApiResponse<User>> {
        if actor_id == id && !active {
            return Err(AppError::Forbidden("No puedes desactivar tu propia cuenta".to_string()));
        }

        let user = self
            .users
            .set_active(id, active)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))?;

        log::info!("👤 Usuario {} {}", user.email, if active { "activado" } else { "desactivado" });
        Ok(ApiResponse::success_with_message(user, "Usuario actualizado exitosamente"))
    }

    /// Cambia el rol; un admin no puede quitarse el rol a sí mismo
    pub async fn set_role(&self, actor_id: Uuid, id: Uuid, role: UserRole) -> AppResult<ApiResponse<User>> {
        if actor_id == id && role != UserRole::Admin {
            return Err(AppError::Forbidden("No puedes quitarte el rol de administrador".to_string()));
        }

        let user = self
            .users
            .set_role(id, role)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))?;

        log::info!("👤 Usuario {} ahora es {}", user.email, user.role.as_str());
        Ok(ApiResponse::success_with_message(user, "Rol actualizado exitosamente"))
    }
}
