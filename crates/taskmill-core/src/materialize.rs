use chrono::{Duration, NaiveDate};

use crate::error::CoreError;
use crate::models::{DocumentRequest, RecurringTemplate, TaskCreationRequest};

/// Turns a fired template into a concrete task-creation request.
///
/// The payload is copied field by field; the due and target dates are
/// derived from the template's day offsets relative to `creation_date`, and
/// an absent offset leaves the corresponding date unset. Status is left to
/// the task-creation collaborator, which defaults new tasks to pending.
///
/// The stored document-request JSON is decoded strictly here: a blob that no
/// longer matches the descriptor shape fails materialization for this
/// template alone, leaving the scheduler free to continue with the rest.
pub fn instantiate(
    template: &RecurringTemplate,
    creation_date: NaiveDate,
) -> Result<TaskCreationRequest, CoreError> {
    let document_request = parse_document_request(template)?;

    let due_date = template
        .due_date_offset
        .map(|offset| creation_date + Duration::days(i64::from(offset)));
    let target_date = template
        .target_date_offset
        .map(|offset| creation_date + Duration::days(i64::from(offset)));

    Ok(TaskCreationRequest {
        title: template.title.clone(),
        description: template.description.clone(),
        client_id: template.client_id,
        service_id: template.service_id,
        priority: template.priority,
        assigned_to: template.assigned_to,
        tag_id: template.tag_id,
        document_request,
        due_date,
        target_date,
    })
}

fn parse_document_request(
    template: &RecurringTemplate,
) -> Result<Option<DocumentRequest>, CoreError> {
    match &template.document_request {
        None => Ok(None),
        Some(raw) => serde_json::from_str(raw).map(Some).map_err(|e| {
            CoreError::InvalidDocumentRequest {
                template_id: template.id,
                reason: e.to_string(),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentRequestItem, RecurrenceFrequency, RecurrenceRule, TaskPriority};
    use chrono::Utc;
    use uuid::Uuid;

    fn template() -> RecurringTemplate {
        RecurringTemplate {
            id: Uuid::now_v7(),
            agency_id: Uuid::now_v7(),
            title: "Monthly VAT filing".to_string(),
            description: Some("File the VAT return".to_string()),
            client_id: Some(Uuid::now_v7()),
            service_id: None,
            priority: Some(TaskPriority::P2),
            assigned_to: Some(Uuid::now_v7()),
            tag_id: None,
            document_request: None,
            rule: RecurrenceRule {
                frequency: RecurrenceFrequency::Monthly,
                interval: 1,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: None,
                day_of_week: None,
                day_of_month: Some(5),
                week_of_month: None,
            },
            due_date_offset: None,
            target_date_offset: None,
            is_active: true,
            created_by: Uuid::now_v7(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_fired_at: None,
        }
    }

    #[test]
    fn copies_payload_fields() {
        let t = template();
        let creation = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let req = instantiate(&t, creation).unwrap();

        assert_eq!(req.title, t.title);
        assert_eq!(req.description, t.description);
        assert_eq!(req.client_id, t.client_id);
        assert_eq!(req.priority, Some(TaskPriority::P2));
        assert_eq!(req.assigned_to, t.assigned_to);
    }

    #[test]
    fn due_date_is_creation_plus_offset() {
        let mut t = template();
        t.due_date_offset = Some(7);
        t.target_date_offset = Some(3);
        let creation = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let req = instantiate(&t, creation).unwrap();

        assert_eq!(req.due_date, NaiveDate::from_ymd_opt(2024, 2, 12));
        assert_eq!(req.target_date, NaiveDate::from_ymd_opt(2024, 2, 8));
    }

    #[test]
    fn absent_offsets_leave_dates_unset() {
        let mut t = template();
        t.due_date_offset = None;
        t.target_date_offset = None;
        let req = instantiate(&t, NaiveDate::from_ymd_opt(2024, 2, 5).unwrap()).unwrap();

        assert_eq!(req.due_date, None);
        assert_eq!(req.target_date, None);
    }

    #[test]
    fn offset_may_cross_month_boundary() {
        let mut t = template();
        t.due_date_offset = Some(30);
        let req = instantiate(&t, NaiveDate::from_ymd_opt(2024, 2, 5).unwrap()).unwrap();
        assert_eq!(req.due_date, NaiveDate::from_ymd_opt(2024, 3, 6));
    }

    #[test]
    fn decodes_document_request_json() {
        let mut t = template();
        t.document_request = Some(
            r#"{"enabled": true, "items": [{"name": "Bank statement", "required": true}]}"#
                .to_string(),
        );
        let req = instantiate(&t, NaiveDate::from_ymd_opt(2024, 2, 5).unwrap()).unwrap();

        let doc = req.document_request.unwrap();
        assert!(doc.enabled);
        assert_eq!(
            doc.items,
            vec![DocumentRequestItem {
                name: "Bank statement".to_string(),
                required: true,
            }]
        );
    }

    #[test]
    fn malformed_document_request_fails_this_template_only() {
        let mut t = template();
        t.document_request = Some(r#"{"enabled": "definitely"}"#.to_string());
        let err = instantiate(&t, NaiveDate::from_ymd_opt(2024, 2, 5).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidDocumentRequest { template_id, .. } if template_id == t.id
        ));
    }
}
