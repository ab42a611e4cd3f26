//! Servicio de autenticación
//!
//! Alta de conductores, login con bcrypt + JWT y resolución del usuario
//! a partir del token de cada request.

use bcrypt::{hash, verify};
use std::sync::Arc;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::models::user::{User, UserRole};
use crate::repositories::{UserRepository, UNIQUE_USER_EMAIL};
use crate::utils::errors::{conflict_error, AppError, AppResult};
use crate::utils::jwt::{generate_token, verify_token, JwtConfig};

const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtConfig,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtConfig, hash_cost: u32) -> Self {
        Self { users, jwt, hash_cost }
    }

    /// Registro público: siempre con rol `user`
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;
        self.create_user(&request.email, &request.password, &request.display_name, UserRole::User)
            .await
    }

    /// Crea un usuario con la contraseña ya validada
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        role: UserRole,
    ) -> AppResult<User> {
        let email = email.trim().to_lowercase();
        if self.users.email_exists(&email).await? {
            return Err(conflict_error("User", "email", &email));
        }

        let password_hash = hash(password, self.hash_cost)?;
        let user = User::new(email.clone(), password_hash, display_name.trim().to_string(), role);

        let created = self.users.create(&user).await.map_err(|e| match e {
            AppError::Conflict(constraint) if constraint == UNIQUE_USER_EMAIL => {
                conflict_error("User", "email", &email)
            }
            other => other,
        })?;

        log::info!("👤 Usuario creado: {} ({})", created.email, created.role.as_str());
        Ok(created)
    }

    /// Login: email desconocido, usuario inactivo o contraseña errónea
    /// devuelven el mismo 401
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(request.email.trim())
            .await?
            .filter(|user| user.active)
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify(&request.password, &user.password_hash)? {
            log::warn!("🔐 Contraseña incorrecta para {}", user.email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = generate_token(user.id, user.role, &self.jwt)?;
        log::info!("🔑 Login correcto: {}", user.email);
        Ok(LoginResponse::bearer(token, self.jwt.expiration, user))
    }

    /// Valida el token y recarga el usuario; los inactivos quedan fuera
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = verify_token(token, &self.jwt)
            .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

        let user = self
            .users
            .find_by_id(claims.user_id()?)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

        if !user.active {
            return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryStore;

    fn service(store: &InMemoryStore) -> AuthService {
        let jwt = JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        };
        AuthService::new(Arc::new(store.clone()), jwt, 4)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "segredo".to_string(),
            display_name: "Ana".to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let store = InMemoryStore::new();
        let user = service(&store).register(register_request("Ana@Frota.com")).await.unwrap();

        assert_eq!(user.email, "ana@frota.com");
        assert_eq!(user.role, UserRole::User);
        assert_ne!(user.password_hash, "segredo");
        assert!(verify("segredo", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let store = InMemoryStore::new();
        let auth = service(&store);
        auth.register(register_request("ana@frota.com")).await.unwrap();

        let err = auth.register(register_request("ANA@frota.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_and_authenticate() {
        let store = InMemoryStore::new();
        let auth = service(&store);
        let user = auth.register(register_request("ana@frota.com")).await.unwrap();

        let response = auth.login(login_request("ana@frota.com", "segredo")).await.unwrap();
        assert_eq!(response.user.id, user.id);
        assert_eq!(response.token_type, "Bearer");

        let authenticated = auth.authenticate(&response.token).await.unwrap();
        assert_eq!(authenticated.id, user.id);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password_and_inactive_user() {
        let store = InMemoryStore::new();
        let auth = service(&store);
        let user = auth.register(register_request("ana@frota.com")).await.unwrap();

        let wrong = auth.login(login_request("ana@frota.com", "errada")).await.unwrap_err();
        assert!(matches!(wrong, AppError::Unauthorized(_)));

        let unknown = auth.login(login_request("bia@frota.com", "segredo")).await.unwrap_err();
        assert!(matches!(unknown, AppError::Unauthorized(_)));

        let token = auth.login(login_request("ana@frota.com", "segredo")).await.unwrap().token;
        store.set_active(user.id, false).await.unwrap();

        let inactive = auth.login(login_request("ana@frota.com", "segredo")).await.unwrap_err();
        assert!(matches!(inactive, AppError::Unauthorized(_)));
        assert!(matches!(auth.authenticate(&token).await, Err(AppError::Unauthorized(_))));
    }
}
