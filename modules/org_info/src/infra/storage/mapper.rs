use uuid::Uuid;

use crate::contract::model::{Department, Employee, Project, ProjectPriority, ProjectStatus};
use crate::domain::error::DomainError;
use crate::infra::storage::entity::{department, employee, project};

/// Convert a database entity to a contract model
pub fn department_to_contract(entity: department::Model) -> Department {
    Department {
        id: entity.id,
        name: entity.name,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

pub fn employee_to_contract(entity: employee::Model) -> Employee {
    Employee {
        id: entity.id,
        name: entity.name,
        email: entity.email,
        department_id: entity.department_id,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// Project rows carry status/priority as text; an unknown value means the
/// table was written by something else and is reported as an outage.
pub fn project_to_contract(
    entity: project::Model,
    mut team_member_ids: Vec<Uuid>,
) -> Result<Project, DomainError> {
    let status: ProjectStatus = entity
        .status
        .parse()
        .map_err(|e: String| DomainError::store_unavailable(format!("corrupt project row: {e}")))?;
    let priority: ProjectPriority = entity
        .priority
        .parse()
        .map_err(|e: String| DomainError::store_unavailable(format!("corrupt project row: {e}")))?;
    team_member_ids.sort();

    Ok(Project {
        id: entity.id,
        name: entity.name,
        description: entity.description,
        status,
        priority,
        start_date: entity.start_date,
        end_date: entity.end_date,
        budget: entity.budget,
        team_member_ids,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}
