// crates/addressbook-cli/src/walkthrough.rs
// ============================================================================
// Module: Walkthrough Runner
// Description: Fixed end-to-end sequence across every address book endpoint.
// Purpose: Chain tokens and ids from earlier replies into later requests.
// Dependencies: addressbook-client, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`Walkthrough::run`] registers a user, obtains a token, then exercises the
//! contact, contact-list, search, and membership endpoints in a fixed order.
//! Every request is narrated before it is sent and every reply after it is
//! received.
//!
//! ## Invariants
//! - Requests are strictly sequential; no step starts before the previous
//!   reply has been fully read.
//! - The first failure aborts the run; later steps are never attempted.
//! - Only the registration and token requests are sent without a token.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;

use addressbook_client::AddressBookClient;
use addressbook_client::ApiReply;
use addressbook_client::ApiRequest;
use addressbook_client::ClientError;
use addressbook_client::ContactDraft;
use addressbook_client::Credentials;
use addressbook_client::ResourceId;
use thiserror::Error;
use tracing::info;

use crate::t;
use crate::transcript::Transcript;
use crate::transcript::TranscriptError;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Contacts created in order; ids of all but the first are tracked.
const DEMO_CONTACTS: [(&str, &str, &str); 4] = [
    ("name", "surname", "valid@mail.com"),
    ("name2", "surname2", "valid2@mail.com"),
    ("name3", "surname3", "valid3@mail.com"),
    ("name4", "surname4", "valid4@mail.com"),
];

/// Contact-lists created before the first re-list.
const DEMO_LISTS: [&str; 3] = ["name", "name2", "name3"];

/// Contact-list created after the deletion, used to contrast searches.
const DIFFERENT_LIST: &str = "differentName";

/// Search term matching every demo list name.
const BROAD_SEARCH: &str = "name";

/// Search term matching only [`DIFFERENT_LIST`].
const NARROW_SEARCH: &str = "different";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a walkthrough stops early.
#[derive(Debug, Error)]
pub enum WalkthroughError {
    /// A request failed or its reply lacked a required field.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// The transcript could not be rendered or written.
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

impl From<io::Error> for WalkthroughError {
    fn from(err: io::Error) -> Self {
        Self::Transcript(TranscriptError::Output(err))
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Identifiers observed during a completed walkthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkthroughSummary {
    /// Ids of the second, third, and fourth contacts.
    pub contacts: [ResourceId; 3],
    /// Contact deleted after being fetched.
    pub deleted_contact: ResourceId,
    /// Ids of the `name`, `name2`, `name3`, and `differentName` lists.
    pub contact_lists: [ResourceId; 4],
    /// Contact-list deleted after being fetched.
    pub deleted_contact_list: ResourceId,
    /// Contact-list that received members.
    pub populated_list: ResourceId,
    /// Contacts added to [`Self::populated_list`].
    pub added_members: [ResourceId; 2],
    /// Contact removed from [`Self::populated_list`].
    pub removed_member: ResourceId,
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Sequential walkthrough over a single client session.
pub struct Walkthrough<W: Write> {
    /// HTTP client; gains a bearer token partway through.
    client: AddressBookClient,
    /// Account used for registration and token issuance.
    credentials: Credentials,
    /// Narration sink.
    transcript: Transcript<W>,
}

impl<W: Write> Walkthrough<W> {
    /// Creates a walkthrough.
    pub const fn new(
        client: AddressBookClient,
        credentials: Credentials,
        transcript: Transcript<W>,
    ) -> Self {
        Self {
            client,
            credentials,
            transcript,
        }
    }

    /// Returns the client, including any installed token.
    pub const fn client(&self) -> &AddressBookClient {
        &self.client
    }

    /// Consumes the walkthrough, returning the transcript.
    pub fn into_transcript(self) -> Transcript<W> {
        self.transcript
    }

    /// Runs every step in order.
    ///
    /// # Errors
    ///
    /// Returns [`WalkthroughError`] on the first failed request, missing reply
    /// field, or output failure.
    pub fn run(&mut self) -> Result<WalkthroughSummary, WalkthroughError> {
        info!(
            base_url = %self.client.base_url(),
            username = %self.credentials.username,
            "walkthrough starting"
        );
        self.authenticate()?;
        let (contacts, deleted_contact) = self.contacts()?;
        let (contact_lists, deleted_contact_list) = self.contact_lists()?;
        self.searches()?;
        let populated_list = contact_lists[0];
        let added_members = [contacts[0], contacts[1]];
        let removed_member = self.memberships(populated_list, added_members)?;
        self.transcript.flush()?;
        info!("walkthrough finished");
        Ok(WalkthroughSummary {
            contacts,
            deleted_contact,
            contact_lists,
            deleted_contact_list,
            populated_list,
            added_members,
            removed_member,
        })
    }

    /// Registers the account and installs the issued token.
    fn authenticate(&mut self) -> Result<(), WalkthroughError> {
        let register = ApiRequest::register_user(&self.credentials);
        self.step(&t!("step.user.create"), &register)?;
        let issue = ApiRequest::create_token(&self.credentials);
        let reply = self.step(&t!("step.token.create"), &issue)?;
        let grant = reply.token_grant()?;
        if let Some(user) = &grant.user {
            info!(user_id = user.id, username = %user.username, "session token issued");
        }
        self.transcript.line(&t!("step.token.extracted", token = grant.token.header_value()))?;
        self.client.install_token(grant.token);
        Ok(())
    }

    /// Creates, lists, fetches, and deletes contacts.
    fn contacts(&mut self) -> Result<([ResourceId; 3], ResourceId), WalkthroughError> {
        let [first, rest @ ..] =
            DEMO_CONTACTS.map(|(name, surname, email)| ContactDraft::new(name, surname, email));
        self.step(&t!("step.contact.create"), &ApiRequest::create_contact(&first))?;
        let mut ids = [ResourceId::new(0); 3];
        for (slot, draft) in ids.iter_mut().zip(rest.iter()) {
            let request = ApiRequest::create_contact(draft);
            let reply = self.step(&t!("step.contact.create_another"), &request)?;
            *slot = reply.created_id()?;
        }
        let target = ids[2];
        self.step(&t!("step.contact.list"), &ApiRequest::list_contacts())?;
        self.step(&t!("step.contact.get", id = target), &ApiRequest::get_contact(target))?;
        self.step(&t!("step.contact.delete", id = target), &ApiRequest::delete_contact(target))?;
        self.step(&t!("step.contact.list"), &ApiRequest::list_contacts())?;
        Ok((ids, target))
    }

    /// Creates, lists, fetches, and deletes contact-lists.
    fn contact_lists(&mut self) -> Result<([ResourceId; 4], ResourceId), WalkthroughError> {
        let mut ids = [ResourceId::new(0); 4];
        for (index, name) in DEMO_LISTS.iter().enumerate() {
            let heading = if index == 0 {
                t!("step.contact_list.create")
            } else {
                t!("step.contact_list.create_another")
            };
            let reply = self.step(&heading, &ApiRequest::create_contact_list(name))?;
            ids[index] = reply.created_id()?;
        }
        let target = ids[2];
        self.step(&t!("step.contact_list.list"), &ApiRequest::list_contact_lists())?;
        self.step(
            &t!("step.contact_list.get", id = target),
            &ApiRequest::get_contact_list(target),
        )?;
        self.step(
            &t!("step.contact_list.delete", id = target),
            &ApiRequest::delete_contact_list(target),
        )?;
        self.step(&t!("step.contact_list.list"), &ApiRequest::list_contact_lists())?;
        let reply = self.step(
            &t!("step.contact_list.create_another"),
            &ApiRequest::create_contact_list(DIFFERENT_LIST),
        )?;
        ids[3] = reply.created_id()?;
        Ok((ids, target))
    }

    /// Runs a broad and a narrow contact-list search.
    fn searches(&mut self) -> Result<(), WalkthroughError> {
        self.step(
            &t!("step.contact_list.search"),
            &ApiRequest::search_contact_lists(BROAD_SEARCH),
        )?;
        self.step(
            &t!("step.contact_list.search_another"),
            &ApiRequest::search_contact_lists(NARROW_SEARCH),
        )?;
        Ok(())
    }

    /// Adds two contacts to `list`, removes the second, and lists members.
    fn memberships(
        &mut self,
        list: ResourceId,
        members: [ResourceId; 2],
    ) -> Result<ResourceId, WalkthroughError> {
        for contact in members {
            self.step(
                &t!("step.membership.add", contact = contact, list = list),
                &ApiRequest::add_to_contact_list(list, contact),
            )?;
        }
        self.step(
            &t!("step.membership.list", list = list),
            &ApiRequest::list_contact_list_members(list),
        )?;
        let removed = members[1];
        self.step(
            &t!("step.membership.remove", contact = removed, list = list),
            &ApiRequest::remove_from_contact_list(list, removed),
        )?;
        self.step(
            &t!("step.membership.list", list = list),
            &ApiRequest::list_contact_list_members(list),
        )?;
        Ok(removed)
    }

    /// Narrates, sends, and narrates the reply of one request.
    fn step(&mut self, heading: &str, request: &ApiRequest) -> Result<ApiReply, WalkthroughError> {
        self.transcript.heading(heading)?;
        self.transcript.request(request)?;
        let reply = self.client.execute(request)?;
        self.transcript.reply(&reply)?;
        Ok(reply)
    }
}
