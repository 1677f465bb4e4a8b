//! Accounts
//!
//! 회원가입 / 로그인 / 프로필 수정 / 계정 상태 변경, 그리고 관리자 로그인.
//!
//! 비밀번호는 bcrypt 해시로만 저장한다. 추천 코드는 가입 시 6자리
//! 대문자+숫자로 생성하며, 충돌하면 새 코드로 다시 시도한다.

use rand::Rng;
use serde::Serialize;

use super::{ServiceError, ServiceResult};
use crate::config::Config;
use crate::db::{AccountStatus, NewUser, ProfileUpdate, Repository, StoreError, User};

const REFERRAL_CODE_LEN: usize = 6;
const REFERRAL_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REFERRAL_CODE_ATTEMPTS: usize = 5;

/// 기본 관리자 권한
pub const DEFAULT_ADMIN_PERMISSIONS: [&str; 5] =
    ["users", "investments", "withdrawals", "profits", "settings"];

/// 회원가입 입력
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub phone: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    /// 추천인 코드. 없는 코드면 무시
    pub referral_code: Option<String>,
}

/// 관리자 로그인 결과
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminSession {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

/// 6자리 추천 코드 생성
pub fn generate_referral_code() -> String {
    let mut rng = rand::thread_rng();
    (0..REFERRAL_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..REFERRAL_CODE_CHARSET.len());
            REFERRAL_CODE_CHARSET[idx] as char
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 회원가입
pub async fn register(
    repo: &dyn Repository,
    config: &Config,
    input: Registration,
) -> ServiceResult<User> {
    let username = input.username.trim().to_string();
    let phone = input.phone.trim().to_string();
    if username.is_empty() || phone.is_empty() || input.password.is_empty() {
        return Err(ServiceError::validation(
            "Username, phone and password required",
        ));
    }

    let referred_by = match non_empty(input.referral_code) {
        Some(code) => {
            let referrer = repo
                .find_user_id_by_referral_code(&code.to_ascii_uppercase())
                .await?;
            if referrer.is_none() {
                tracing::debug!(code = %code, "Unknown referral code ignored");
            }
            referrer
        }
        None => None,
    };

    let password_hash = bcrypt::hash(&input.password, config.password_cost)?;

    let mut new_user = NewUser {
        username,
        phone,
        password_hash,
        referral_code: generate_referral_code(),
        referred_by,
        full_name: non_empty(input.full_name),
        email: non_empty(input.email),
        bep20_address: config.bep20_address.clone(),
    };

    for attempt in 1..=REFERRAL_CODE_ATTEMPTS {
        match repo.insert_user(&new_user).await {
            Ok(user) => {
                tracing::info!(
                    user_id = user.id,
                    username = %user.username,
                    referred_by = ?user.referred_by,
                    "User registered"
                );
                return Ok(user);
            }
            Err(StoreError::Duplicate(field)) => match field.as_str() {
                "username" => {
                    return Err(ServiceError::Conflict("Username already exists".into()))
                }
                "phone" => {
                    return Err(ServiceError::Conflict("Phone already registered".into()))
                }
                "referral_code" => {
                    tracing::debug!(attempt, "Referral code collision, retrying");
                    new_user.referral_code = generate_referral_code();
                }
                _ => return Err(StoreError::Duplicate(field).into()),
            },
            Err(e) => return Err(e.into()),
        }
    }

    Err(ServiceError::Conflict(
        "Could not allocate a referral code".into(),
    ))
}

/// 전화번호 + 비밀번호 로그인 (active 계정만)
pub async fn login(repo: &dyn Repository, phone: &str, password: &str) -> ServiceResult<User> {
    let phone = phone.trim();
    if phone.is_empty() || password.is_empty() {
        return Err(ServiceError::validation("Phone and password required"));
    }

    let invalid = || ServiceError::InvalidCredentials("Invalid phone or password".into());

    let user = repo.find_user_by_phone(phone).await?.ok_or_else(invalid)?;
    if AccountStatus::parse(&user.status) != Some(AccountStatus::Active) {
        return Err(invalid());
    }
    if !bcrypt::verify(password, &user.password_hash)? {
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(user)
}

/// 프로필 수정. 넘어온 필드만 바뀐다
pub async fn update_profile(
    repo: &dyn Repository,
    user_id: Option<i64>,
    update: ProfileUpdate,
) -> ServiceResult<()> {
    let user_id = user_id.ok_or_else(|| ServiceError::validation("User ID required"))?;

    let update = ProfileUpdate {
        full_name: non_empty(update.full_name),
        email: non_empty(update.email),
        bkash_number: non_empty(update.bkash_number),
    };

    if !repo.update_profile(user_id, &update).await? {
        return Err(ServiceError::NotFound("User"));
    }

    tracing::info!(user_id, "Profile updated");
    Ok(())
}

/// 계정 상태 변경 (관리자)
pub async fn set_status(repo: &dyn Repository, user_id: i64, status: &str) -> ServiceResult<()> {
    let status = AccountStatus::parse(status)
        .ok_or_else(|| ServiceError::validation("Status must be active or inactive"))?;

    if !repo.set_user_status(user_id, status).await? {
        return Err(ServiceError::NotFound("User"));
    }

    tracing::info!(user_id, status = status.as_str(), "User status changed");
    Ok(())
}

/// 관리자 로그인
pub async fn admin_login(
    repo: &dyn Repository,
    username: &str,
    password: &str,
) -> ServiceResult<AdminSession> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ServiceError::validation("Username and password required"));
    }

    let invalid = || ServiceError::InvalidCredentials("Invalid admin credentials".into());

    let admin = repo
        .find_admin_by_username(username)
        .await?
        .ok_or_else(invalid)?;
    if admin.status != "active" || !bcrypt::verify(password, &admin.password_hash)? {
        return Err(invalid());
    }

    tracing::info!(admin_id = admin.id, role = %admin.role, "Admin logged in");
    Ok(AdminSession {
        id: admin.id,
        username: admin.username,
        role: admin.role,
        permissions: admin.permissions.0,
    })
}

/// 기본 관리자 계정 생성 (이미 있으면 그대로 둔다)
pub async fn ensure_default_admin(repo: &dyn Repository, config: &Config) -> ServiceResult<bool> {
    let password_hash = bcrypt::hash(&config.admin_password, config.password_cost)?;
    let permissions: Vec<String> = DEFAULT_ADMIN_PERMISSIONS
        .iter()
        .map(|p| p.to_string())
        .collect();

    let created = repo
        .ensure_admin(
            &config.admin_username,
            &password_hash,
            "super_admin",
            &permissions,
        )
        .await?;

    if created {
        tracing::info!(username = %config.admin_username, "Default admin created");
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock::MockRepository;
    use crate::db::UserRepository;

    fn registration(username: &str, phone: &str) -> Registration {
        Registration {
            username: username.to_string(),
            phone: phone.to_string(),
            password: "secret".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_referral_code_shape() {
        for _ in 0..50 {
            let code = generate_referral_code();
            assert_eq!(code.len(), 6);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_register_links_known_referrer() {
        let repo = MockRepository::new();
        let config = Config::for_tests();
        let parent = repo.seed_user("parent", Default::default(), Default::default(), None);

        let mut input = registration("child", "01711111111");
        input.referral_code = Some(" ref001 ".to_string());
        let user = register(&repo, &config, input).await.unwrap();

        assert_eq!(user.referred_by, Some(parent));
        assert_eq!(user.bep20_address.as_deref(), Some(config.bep20_address.as_str()));
        assert_ne!(user.password_hash, "secret");
        assert_eq!(user.referral_code.as_ref().map(String::len), Some(6));
    }

    #[tokio::test]
    async fn test_register_ignores_unknown_referral_code() {
        let repo = MockRepository::new();
        let mut input = registration("child", "01711111111");
        input.referral_code = Some("NOPE42".to_string());

        let user = register(&repo, &Config::for_tests(), input).await.unwrap();

        assert_eq!(user.referred_by, None);
    }

    #[tokio::test]
    async fn test_register_duplicates_and_missing_fields() {
        let repo = MockRepository::new();
        let config = Config::for_tests();
        register(&repo, &config, registration("alice", "0171")).await.unwrap();

        let err = register(&repo, &config, registration("alice", "0172"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Username already exists");

        let err = register(&repo, &config, registration("bob", "0171"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Phone already registered");

        let err = register(&repo, &config, registration("", "0173"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Username, phone and password required");
    }

    #[tokio::test]
    async fn test_login_checks_password_and_status() {
        let repo = MockRepository::new();
        let config = Config::for_tests();
        let user = register(&repo, &config, registration("alice", "01711111111"))
            .await
            .unwrap();

        let logged_in = login(&repo, "01711111111", "secret").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let err = login(&repo, "01711111111", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid phone or password");

        let err = login(&repo, "01799999999", "secret").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid phone or password");

        set_status(&repo, user.id, "inactive").await.unwrap();
        let err = login(&repo, "01711111111", "secret").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials(_)));

        let err = login(&repo, "", "secret").await.unwrap_err();
        assert_eq!(err.to_string(), "Phone and password required");
    }

    #[tokio::test]
    async fn test_update_profile_only_touches_supplied_fields() {
        let repo = MockRepository::new();
        let id = repo.seed_user("alice", Default::default(), Default::default(), None);

        update_profile(
            &repo,
            Some(id),
            ProfileUpdate {
                full_name: Some("Alice".into()),
                email: Some("a@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        update_profile(
            &repo,
            Some(id),
            ProfileUpdate {
                bkash_number: Some("01712345678".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let user = repo.find_user(id).await.unwrap().unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Alice"));
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
        assert_eq!(user.bkash_number.as_deref(), Some("01712345678"));

        let err = update_profile(&repo, None, ProfileUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User ID required");

        let err = update_profile(&repo, Some(999), ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("User")));
    }

    #[tokio::test]
    async fn test_set_status_validation() {
        let repo = MockRepository::new();
        let id = repo.seed_user("alice", Default::default(), Default::default(), None);

        assert!(set_status(&repo, id, "banned").await.is_err());
        set_status(&repo, id, "inactive").await.unwrap();
        assert_eq!(repo.user(id).status, "inactive");
    }

    #[tokio::test]
    async fn test_default_admin_seed_and_login() {
        let repo = MockRepository::new();
        let config = Config::for_tests();

        assert!(ensure_default_admin(&repo, &config).await.unwrap());
        assert!(!ensure_default_admin(&repo, &config).await.unwrap());

        let session = admin_login(&repo, "admin", "admin123").await.unwrap();
        assert_eq!(session.role, "super_admin");
        assert_eq!(session.permissions.len(), 5);
        assert!(session.permissions.contains(&"withdrawals".to_string()));

        let err = admin_login(&repo, "admin", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid admin credentials");
    }
}
