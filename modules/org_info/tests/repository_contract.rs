//! Behaviour every store must share: the SeaORM store over SQLite and the
//! in-memory store answer each call with the same data and error kinds.

mod common;

use common::{all_stores, department, employee, project};
use org_info::domain::error::{DomainError, ErrorKind};
use org_info::model::ProjectStatus;
use uuid::Uuid;

fn kind<T: std::fmt::Debug>(res: Result<T, DomainError>) -> ErrorKind {
    res.expect_err("expected an error").kind()
}

#[tokio::test]
async fn department_round_trip() {
    for s in all_stores().await {
        // Arrange
        let dept = department("Engineering");

        // Act
        s.departments.save(dept.clone()).await.unwrap();
        let found = s.departments.find_by_id(&dept.id.to_string()).await.unwrap();

        // Assert
        assert_eq!(found.id, dept.id, "{}", s.label);
        assert_eq!(found.name, "Engineering", "{}", s.label);
    }
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    for s in all_stores().await {
        assert!(s.departments.find_all().await.unwrap().is_empty(), "{}", s.label);
        assert!(s.employees.find_all().await.unwrap().is_empty(), "{}", s.label);
        assert!(s.projects.find_all().await.unwrap().is_empty(), "{}", s.label);
        let none = s
            .employees
            .find_by_department_id(&Uuid::new_v4().to_string())
            .await
            .unwrap();
        assert!(none.is_empty(), "{}", s.label);
    }
}

#[tokio::test]
async fn lists_are_ordered_by_name() {
    for s in all_stores().await {
        for name in ["Sales", "Engineering", "Marketing"] {
            s.departments.save(department(name)).await.unwrap();
        }

        let names: Vec<String> = s
            .departments
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();

        assert_eq!(names, ["Engineering", "Marketing", "Sales"], "{}", s.label);
    }
}

#[tokio::test]
async fn malformed_ids_are_invalid_input() {
    for s in all_stores().await {
        assert_eq!(
            kind(s.departments.find_by_id("not-a-uuid").await),
            ErrorKind::InvalidInput,
            "{}",
            s.label
        );
        assert_eq!(kind(s.departments.delete("").await), ErrorKind::InvalidInput);
        assert_eq!(kind(s.employees.find_by_id("123").await), ErrorKind::InvalidInput);
        assert_eq!(
            kind(s.employees.find_by_department_id("nope").await),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            kind(s.projects.find_by_employee_id("nope").await),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            kind(s.departments.find_by_id(&Uuid::nil().to_string()).await),
            ErrorKind::InvalidInput,
            "nil id is malformed ({})",
            s.label
        );
    }
}

#[tokio::test]
async fn saving_a_nil_id_is_rejected() {
    for s in all_stores().await {
        let mut dept = department("Nil");
        dept.id = Uuid::nil();

        let err = s.departments.save(dept).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{}", s.label);
        assert!(s.departments.find_all().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn absent_rows_are_not_found() {
    for s in all_stores().await {
        let id = Uuid::new_v4().to_string();

        assert_eq!(kind(s.departments.find_by_id(&id).await), ErrorKind::NotFound);
        assert_eq!(kind(s.departments.delete(&id).await), ErrorKind::NotFound);
        assert_eq!(
            kind(s.departments.update(department("Ghost")).await),
            ErrorKind::NotFound,
            "{}",
            s.label
        );
        assert_eq!(kind(s.employees.find_by_id(&id).await), ErrorKind::NotFound);
        assert_eq!(kind(s.projects.find_by_id(&id).await), ErrorKind::NotFound);
        assert_eq!(kind(s.projects.delete(&id).await), ErrorKind::NotFound);
    }
}

#[tokio::test]
async fn second_delete_is_not_found() {
    for s in all_stores().await {
        let dept = department("Temp");
        s.departments.save(dept.clone()).await.unwrap();
        let id = dept.id.to_string();

        s.departments.delete(&id).await.unwrap();
        let again = s.departments.delete(&id).await;

        assert_eq!(kind(again), ErrorKind::NotFound, "{}", s.label);
    }
}

#[tokio::test]
async fn duplicate_primary_key_is_conflict() {
    for s in all_stores().await {
        let dept = department("Once");
        s.departments.save(dept.clone()).await.unwrap();

        let err = s.departments.save(dept).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict, "{}", s.label);
    }
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    for s in all_stores().await {
        let dept = department("Engineering");
        s.departments.save(dept.clone()).await.unwrap();
        s.employees
            .save(employee("Ada", "ada@example.com", dept.id))
            .await
            .unwrap();

        let err = s
            .employees
            .save(employee("Other Ada", "ada@example.com", dept.id))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict, "{}", s.label);
        assert_eq!(s.employees.find_all().await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn email_exists_ignores_the_excluded_employee() {
    for s in all_stores().await {
        let dept = department("Engineering");
        s.departments.save(dept.clone()).await.unwrap();
        let ada = employee("Ada", "ada@example.com", dept.id);
        s.employees.save(ada.clone()).await.unwrap();

        assert!(s.employees.email_exists("ada@example.com", None).await.unwrap());
        assert!(!s
            .employees
            .email_exists("ada@example.com", Some(ada.id))
            .await
            .unwrap());
        assert!(!s.employees.email_exists("bob@example.com", None).await.unwrap());
    }
}

#[tokio::test]
async fn employee_needs_an_existing_department() {
    for s in all_stores().await {
        let orphan = employee("Nobody", "nobody@example.com", Uuid::new_v4());

        let err = s.employees.save(orphan).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict, "{}", s.label);
    }
}

#[tokio::test]
async fn department_with_employees_cannot_be_deleted_directly() {
    for s in all_stores().await {
        let dept = department("Engineering");
        s.departments.save(dept.clone()).await.unwrap();
        s.employees
            .save(employee("Ada", "ada@example.com", dept.id))
            .await
            .unwrap();

        let err = s.departments.delete(&dept.id.to_string()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict, "{}", s.label);
        assert!(!err.is_retryable(), "{}", s.label);
        assert!(s.departments.find_by_id(&dept.id.to_string()).await.is_ok());
    }
}

#[tokio::test]
async fn update_refreshes_updated_at_and_keeps_created_at() {
    for s in all_stores().await {
        let dept = department("Old name");
        s.departments.save(dept.clone()).await.unwrap();
        let before = s.departments.find_by_id(&dept.id.to_string()).await.unwrap();

        let mut renamed = before.clone();
        renamed.name = "New name".to_string();
        let updated = s.departments.update(renamed).await.unwrap();
        let after = s.departments.find_by_id(&dept.id.to_string()).await.unwrap();

        assert_eq!(updated.name, "New name", "{}", s.label);
        assert_eq!(after.name, "New name");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= after.created_at);
    }
}

#[tokio::test]
async fn employees_are_listed_per_department() {
    for s in all_stores().await {
        let eng = department("Engineering");
        let ops = department("Operations");
        s.departments.save(eng.clone()).await.unwrap();
        s.departments.save(ops.clone()).await.unwrap();
        s.employees
            .save(employee("Zed", "zed@example.com", eng.id))
            .await
            .unwrap();
        s.employees
            .save(employee("Ada", "ada@example.com", eng.id))
            .await
            .unwrap();
        s.employees
            .save(employee("Bob", "bob@example.com", ops.id))
            .await
            .unwrap();

        let names: Vec<String> = s
            .employees
            .find_by_department_id(&eng.id.to_string())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(names, ["Ada", "Zed"], "{}", s.label);
    }
}

#[tokio::test]
async fn project_team_membership() {
    for s in all_stores().await {
        // Arrange
        let dept = department("Engineering");
        s.departments.save(dept.clone()).await.unwrap();
        let ada = employee("Ada", "ada@example.com", dept.id);
        let bob = employee("Bob", "bob@example.com", dept.id);
        s.employees.save(ada.clone()).await.unwrap();
        s.employees.save(bob.clone()).await.unwrap();
        let apollo = project("Apollo", ProjectStatus::Active, vec![ada.id]);
        let gemini = project("Gemini", ProjectStatus::OnHold, vec![]);
        s.projects.save(apollo.clone()).await.unwrap();
        s.projects.save(gemini.clone()).await.unwrap();
        let pid = apollo.id.to_string();

        // Act
        let added = s.projects.add_team_member(&pid, &bob.id.to_string()).await.unwrap();
        let again = s.projects.add_team_member(&pid, &bob.id.to_string()).await.unwrap();
        let removed = s
            .projects
            .remove_team_member(&pid, &ada.id.to_string())
            .await
            .unwrap();
        let removed_again = s
            .projects
            .remove_team_member(&pid, &ada.id.to_string())
            .await
            .unwrap();

        // Assert
        let mut both = vec![ada.id, bob.id];
        both.sort();
        assert_eq!(added.team_member_ids, both, "{}", s.label);
        assert_eq!(again.team_member_ids, both, "adding twice is a no-op");
        assert_eq!(removed.team_member_ids, vec![bob.id]);
        assert_eq!(removed_again.team_member_ids, vec![bob.id]);

        let bobs: Vec<_> = s
            .projects
            .find_by_employee_id(&bob.id.to_string())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(bobs, vec![apollo.id]);

        let on_hold = s.projects.find_by_status(ProjectStatus::OnHold).await.unwrap();
        assert_eq!(on_hold.len(), 1);
        assert_eq!(on_hold[0].id, gemini.id);
        assert!(s
            .projects
            .find_by_status(ProjectStatus::Completed)
            .await
            .unwrap()
            .is_empty());
    }
}

#[tokio::test]
async fn team_member_must_exist() {
    for s in all_stores().await {
        let apollo = project("Apollo", ProjectStatus::Active, vec![]);
        s.projects.save(apollo.clone()).await.unwrap();

        let err = s
            .projects
            .add_team_member(&apollo.id.to_string(), &Uuid::new_v4().to_string())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict, "{}", s.label);
    }
}

#[tokio::test]
async fn deleting_an_employee_drops_it_from_teams() {
    for s in all_stores().await {
        let dept = department("Engineering");
        s.departments.save(dept.clone()).await.unwrap();
        let ada = employee("Ada", "ada@example.com", dept.id);
        s.employees.save(ada.clone()).await.unwrap();
        let apollo = project("Apollo", ProjectStatus::Active, vec![ada.id]);
        s.projects.save(apollo.clone()).await.unwrap();

        s.employees.delete(&ada.id.to_string()).await.unwrap();

        let reloaded = s.projects.find_by_id(&apollo.id.to_string()).await.unwrap();
        assert!(reloaded.team_member_ids.is_empty(), "{}", s.label);
    }
}

#[tokio::test]
async fn project_update_replaces_fields_and_team() {
    for s in all_stores().await {
        let dept = department("Engineering");
        s.departments.save(dept.clone()).await.unwrap();
        let ada = employee("Ada", "ada@example.com", dept.id);
        s.employees.save(ada.clone()).await.unwrap();
        let apollo = project("Apollo", ProjectStatus::Active, vec![ada.id]);
        s.projects.save(apollo.clone()).await.unwrap();

        let mut changed = apollo.clone();
        changed.status = ProjectStatus::Completed;
        changed.description = Some("landed".to_string());
        changed.team_member_ids = vec![];
        let updated = s.projects.update(changed).await.unwrap();

        assert_eq!(updated.status, ProjectStatus::Completed, "{}", s.label);
        assert_eq!(updated.description.as_deref(), Some("landed"));
        assert!(updated.team_member_ids.is_empty());
        let reloaded = s.projects.find_by_id(&apollo.id.to_string()).await.unwrap();
        assert_eq!(reloaded.status, ProjectStatus::Completed);
        assert!(reloaded.team_member_ids.is_empty());
    }
}
