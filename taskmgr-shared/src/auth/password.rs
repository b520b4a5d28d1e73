/// Credential hashing using Argon2id
///
/// Passwords are hashed with Argon2id and stored as PHC strings, which embed
/// the algorithm, cost parameters and the per-call random salt. Comparison
/// re-derives the hash with the embedded parameters and compares in
/// constant time.
///
/// # Security
///
/// - **Algorithm**: Argon2id (hybrid of Argon2i and Argon2d)
/// - **Memory**: 64 MB (65536 KB) by default
/// - **Iterations**: 3 passes by default
/// - **Parallelism**: 4 lanes by default
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use taskmgr_shared::auth::password::{Argon2PasswordService, PasswordConfig, PasswordService};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = Argon2PasswordService::new(PasswordConfig::default())?;
/// let digest = service.hash("super_secret_password_123")?;
///
/// assert!(service.compare(&digest, "super_secret_password_123").is_ok());
/// assert!(service.compare(&digest, "wrong_password").is_err());
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    Hash(String),

    /// Candidate password does not match the stored digest
    #[error("Password mismatch")]
    Mismatch,

    /// Stored digest is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism
    pub parallelism: u32,
}

impl PasswordConfig {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 65536, // 64 MB
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Credential service contract
///
/// Any hashing provider offering the same two operations can back the user
/// store and usecases.
pub trait PasswordService: Send + Sync {
    /// Hashes a plaintext password into a self-describing digest
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// Checks a candidate plaintext against a stored digest
    ///
    /// Returns `Err(PasswordError::Mismatch)` when the candidate is wrong.
    fn compare(&self, stored_digest: &str, candidate: &str) -> Result<(), PasswordError>;
}

/// Argon2id implementation of [`PasswordService`]
#[derive(Debug, Clone)]
pub struct Argon2PasswordService {
    params: Params,
}

impl Argon2PasswordService {
    /// Creates a service with the given cost parameters
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::Hash` if Argon2 rejects the parameters
    /// (for example memory below 8 KiB per lane).
    pub fn new(config: PasswordConfig) -> Result<Self, PasswordError> {
        let params = ParamsBuilder::new()
            .m_cost(config.memory_kib)
            .t_cost(config.iterations)
            .p_cost(config.parallelism)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::Hash(format!("Invalid parameters: {}", e)))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self {
            params: Params::new(65536, 3, 4, Some(32)).unwrap_or_default(),
        }
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let digest = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(format!("Hash generation failed: {}", e)))?;

        Ok(digest.to_string())
    }

    fn compare(&self, stored_digest: &str, candidate: &str) -> Result<(), PasswordError> {
        let parsed = PasswordHash::new(stored_digest)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        // Parameters come from the PHC string, not from self.params
        match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::InvalidHash(format!("Verification failed: {}", e))),
        }
    }
}

/// Runs [`PasswordService::hash`] on the blocking thread pool
///
/// Argon2 is CPU and memory bound; calling it inline would stall the async
/// worker serving the request.
pub async fn hash_blocking(
    service: Arc<dyn PasswordService>,
    plaintext: String,
) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || service.hash(&plaintext))
        .await
        .map_err(|e| PasswordError::Hash(format!("Hashing task failed: {}", e)))?
}

/// Runs [`PasswordService::compare`] on the blocking thread pool
pub async fn compare_blocking(
    service: Arc<dyn PasswordService>,
    stored_digest: String,
    candidate: String,
) -> Result<(), PasswordError> {
    tokio::task::spawn_blocking(move || service.compare(&stored_digest, &candidate))
        .await
        .map_err(|e| PasswordError::Hash(format!("Comparison task failed: {}", e)))?
}
