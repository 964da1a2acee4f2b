use contracts::system::roles::Role;
use contracts::system::users::CreateUserDto;

use crate::shared::config::AuthConfig;
use crate::system::users::{repository, service};

/// Первичный суперадмин, если пользователей ещё нет
pub async fn ensure_admin_user_exists(auth: &AuthConfig) -> anyhow::Result<()> {
    let count = repository::count_users().await?;
    if count > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating bootstrap superadmin...");

    let dto = CreateUserDto {
        username: auth.bootstrap_username.clone(),
        password: auth.bootstrap_password.clone(),
        email: None,
        full_name: Some("Super administrator".to_string()),
        role: Role::SuperAdmin,
        dealer_id: None,
        customer_id: None,
    };

    let admin_id = service::create_unchecked(dto, None)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create bootstrap user: {}", e))?;

    tracing::warn!("═══════════════════════════════════════════════");
    tracing::warn!("  Bootstrap superadmin created");
    tracing::warn!("  Username: {}", auth.bootstrap_username);
    tracing::warn!("  User ID: {}", admin_id);
    tracing::warn!("  Change the password after the first login!");
    tracing::warn!("═══════════════════════════════════════════════");

    Ok(())
}
