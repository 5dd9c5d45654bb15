//! Add/edit form construction and validation.
//!
//! Forms are flat label/value pairs; [`submit`] validates the values and
//! turns them into a mutation request, or reports the first problem so
//! the popup can show it inline.

use crate::fetch::MutationRequest;
use crate::model::{Customer, CustomerDraft, Plan, Server, ServerDraft, SessionDraft};
use crate::tui::state::{FormField, FormIntent, FormState};

pub fn customer_create_form() -> FormState {
    FormState::new(
        "New customer",
        FormIntent::CreateCustomer,
        vec![
            FormField::new("Name"),
            FormField::new("Email"),
            FormField::new("Phone"),
            FormField::with_value("Plan", Plan::default().label()),
            FormField::with_value("Session limit", "1"),
        ],
    )
}

pub fn customer_edit_form(customer: &Customer) -> FormState {
    FormState::new(
        "Edit customer",
        FormIntent::EditCustomer {
            id: customer.id.clone(),
        },
        vec![
            FormField::with_value("Name", customer.name.clone().unwrap_or_default()),
            FormField::with_value("Email", customer.email.clone().unwrap_or_default()),
            FormField::with_value("Phone", customer.phone.clone().unwrap_or_default()),
            FormField::with_value("Plan", customer.plan.label()),
            FormField::with_value("Session limit", customer.session_limit.to_string()),
        ],
    )
}

pub fn session_create_form() -> FormState {
    FormState::new(
        "New session",
        FormIntent::CreateSession,
        vec![
            FormField::new("Customer id"),
            FormField::new("Device name"),
            FormField::new("Phone"),
        ],
    )
}

pub fn server_create_form() -> FormState {
    FormState::new(
        "New server",
        FormIntent::CreateServer,
        vec![
            FormField::new("Name"),
            FormField::new("Address"),
            FormField::new("Region"),
            FormField::with_value("Capacity", "100"),
        ],
    )
}

pub fn server_edit_form(server: &Server) -> FormState {
    FormState::new(
        "Edit server",
        FormIntent::EditServer {
            id: server.id.clone(),
        },
        vec![
            FormField::with_value("Name", server.name.clone().unwrap_or_default()),
            FormField::with_value("Address", server.address.clone().unwrap_or_default()),
            FormField::with_value("Region", server.region.clone().unwrap_or_default()),
            FormField::with_value("Capacity", server.capacity.to_string()),
        ],
    )
}

fn required(form: &FormState, label: &'static str) -> Result<String, String> {
    let value = form.value(label);
    if value.is_empty() {
        Err(format!("{label} is required"))
    } else {
        Ok(value.to_string())
    }
}

fn parse_u32(form: &FormState, label: &'static str) -> Result<u32, String> {
    form.value(label)
        .parse::<u32>()
        .map_err(|_| format!("{label} must be a non-negative number"))
}

fn customer_draft(form: &FormState) -> Result<CustomerDraft, String> {
    let plan_text = form.value("Plan");
    let plan = Plan::parse(plan_text)
        .ok_or_else(|| "Plan must be one of trial, basic, pro, enterprise".to_string())?;
    Ok(CustomerDraft {
        name: required(form, "Name")?,
        email: required(form, "Email")?,
        phone: form.value("Phone").to_string(),
        plan,
        session_limit: parse_u32(form, "Session limit")?,
    })
}

fn server_draft(form: &FormState) -> Result<ServerDraft, String> {
    Ok(ServerDraft {
        name: required(form, "Name")?,
        address: required(form, "Address")?,
        region: form.value("Region").to_string(),
        capacity: parse_u32(form, "Capacity")?,
    })
}

/// Validates the form and builds the mutation it requests.
pub fn submit(form: &FormState) -> Result<MutationRequest, String> {
    match &form.intent {
        FormIntent::CreateCustomer => Ok(MutationRequest::CreateCustomer(customer_draft(form)?)),
        FormIntent::EditCustomer { id } => Ok(MutationRequest::UpdateCustomer {
            id: id.clone(),
            draft: customer_draft(form)?,
        }),
        FormIntent::CreateSession => Ok(MutationRequest::CreateSession(SessionDraft {
            customer_id: required(form, "Customer id")?,
            device_name: required(form, "Device name")?,
            phone: form.value("Phone").to_string(),
        })),
        FormIntent::CreateServer => Ok(MutationRequest::CreateServer(server_draft(form)?)),
        FormIntent::EditServer { id } => Ok(MutationRequest::UpdateServer {
            id: id.clone(),
            draft: server_draft(form)?,
        }),
    }
}
