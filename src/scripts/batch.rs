use crate::{
    api::{
        records::{self, CreatedGroup},
        PostOutcome, Session,
    },
    error::{Error, Result},
};
use tracing::{info, warn};

/// What happened when adding one user to a group.
#[derive(Debug)]
pub enum MembershipOutcome {
    Added,
    AlreadyMember,
    /// The name did not match any user on the site; nothing was sent.
    UnknownUser,
    Failed(Error),
}

#[derive(Debug)]
pub struct MembershipResult {
    /// The normalized user name.
    pub user_name: String,
    pub outcome: MembershipOutcome,
}

impl MembershipResult {
    pub fn is_success(&self) -> bool {
        matches!(
            self.outcome,
            MembershipOutcome::Added | MembershipOutcome::AlreadyMember
        )
    }
}

impl Session {
    /// Adds every named user to `group_name`.
    ///
    /// A missing group is an error unless `force` is set, in which case it is
    /// created first. Per-user failures never abort the batch: each user gets
    /// its own `MembershipResult`.
    pub async fn batch_add_users_to_group<S: AsRef<str>>(
        &self,
        user_names: &[S],
        group_name: &str,
        force: bool,
    ) -> Result<Vec<MembershipResult>> {
        let existing = self
            .group_ids_from_names(&[group_name])
            .await?
            .pop()
            .and_then(|lookup| lookup.id);
        let group_id = match existing {
            Some(group_id) => group_id,
            None if force => self.force_group(group_name).await?,
            None => return Err(Error::GroupNotFound(group_name.to_string())),
        };

        let users = self.user_ids_from_names(user_names).await?;
        let mut results = Vec::with_capacity(users.len());
        for user in users {
            let outcome = match &user.id {
                None => {
                    warn!(user = %user.name, group = group_name, "no such user on site");
                    MembershipOutcome::UnknownUser
                }
                Some(user_id) => match self.add_user_to_group(user_id, &group_id).await {
                    Ok(PostOutcome::Created(_)) => {
                        info!(user = %user.name, group = group_name, "added user to group");
                        MembershipOutcome::Added
                    }
                    Ok(PostOutcome::AlreadyExists) => MembershipOutcome::AlreadyMember,
                    Err(error) => {
                        warn!(user = %user.name, group = group_name, %error, "unable to add user to group");
                        MembershipOutcome::Failed(error)
                    }
                },
            };
            results.push(MembershipResult {
                user_name: user.name,
                outcome,
            });
        }
        Ok(results)
    }

    /// Creates the group and returns its id.
    async fn force_group(&self, group_name: &str) -> Result<String> {
        info!(group = group_name, "group does not exist, creating it");
        match self.create_group(group_name).await? {
            PostOutcome::Created(response) => {
                let created: CreatedGroup = records::extract(response)?;
                Ok(created.group.id)
            }
            // Someone beat us to it; the settle pause lets the listing catch up.
            PostOutcome::AlreadyExists => self
                .group_ids_from_names(&[group_name])
                .await?
                .pop()
                .and_then(|lookup| lookup.id)
                .ok_or_else(|| Error::GroupNotFound(group_name.to_string())),
        }
    }
}
