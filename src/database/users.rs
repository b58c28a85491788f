use super::{serialize_id, Store, USERS, USERS_USERNAME};
use crate::error::{Result, ServiceError};
use crate::model::*;
use log::{debug, info};
use sha2::{Digest, Sha256};
use sled::transaction::{TransactionError, Transactional};

pub trait UserDb {
    fn register(&self, username: &str, password: &str) -> Result<u64>;
    fn login(&self, username: &str, password: &str) -> Result<()>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
}

fn require_credentials(username: &str, password: &str) -> Result<()> {
    if username.is_empty() || password.is_empty() {
        return Err(ServiceError::validation("Missing fields"));
    }
    Ok(())
}

// bcrypt only looks at the first 72 bytes of its input, so the password is
// digested first and bcrypt sees a fixed 64 byte hex string.
fn prehash(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl UserDb for Store {
    fn register(&self, username: &str, password: &str) -> Result<u64> {
        require_credentials(username, password)?;
        let users = self.tree(USERS)?;
        let users_username = self.tree(USERS_USERNAME)?;
        // Cheap early rejection; the transaction below re-checks.
        if users_username.contains_key(username.as_bytes())? {
            return Err(ServiceError::DuplicateUser(username.to_owned()));
        }
        let user = User {
            username: username.to_owned(),
            password_hash: bcrypt::hash(prehash(password), self.password_cost)?,
        };
        let record = bincode::serialize(&user)?;
        let id = self.next_id()?;
        let key = serialize_id(id);
        (&users, &users_username)
            .transaction(|(users, users_username)| {
                if users_username.get(username.as_bytes())?.is_some() {
                    return sled::transaction::abort(());
                }
                users_username.insert(username.as_bytes(), &key[..])?;
                users.insert(&key[..], &record[..])?;
                Ok(())
            })
            .map_err(|err| match err {
                TransactionError::Storage(e) => ServiceError::Store(e),
                TransactionError::Abort(()) => ServiceError::DuplicateUser(username.to_owned()),
            })?;
        info!("Registered user {}", username);
        Ok(id)
    }

    fn login(&self, username: &str, password: &str) -> Result<()> {
        require_credentials(username, password)?;
        let user = self
            .get_user_by_username(username)?
            .ok_or(ServiceError::UserNotFound)?;
        if bcrypt::verify(prehash(password), &user.password_hash)? {
            Ok(())
        } else {
            debug!("Password mismatch for {}", username);
            Err(ServiceError::BadSecret)
        }
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users_username = self.tree(USERS_USERNAME)?;
        let users = self.tree(USERS)?;
        let id = match users_username.get(username.as_bytes())? {
            Some(id) => id,
            None => return Ok(None),
        };
        match users.get(&id)? {
            Some(data) => Ok(Some(bincode::deserialize(&data)?)),
            None => Ok(None),
        }
    }
}
