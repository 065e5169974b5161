//! Sample records a fresh workspace starts with.

use super::models::{Activity, ActivityType, Contact, Deal, DealStage, Lead, LeadStatus};

pub fn contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: "1".to_string(),
            name: "John Smith".to_string(),
            company: "Acme Inc".to_string(),
            email: "john@acme.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            notes: Some("Key decision maker for enterprise purchases".to_string()),
            created_at: "2023-01-15T08:30:00.000Z".to_string(),
        },
        Contact {
            id: "2".to_string(),
            name: "Sarah Johnson".to_string(),
            company: "TechCorp".to_string(),
            email: "sarah@techcorp.com".to_string(),
            phone: "(555) 987-6543".to_string(),
            notes: None,
            created_at: "2023-02-20T14:15:00.000Z".to_string(),
        },
        Contact {
            id: "3".to_string(),
            name: "Michael Brown".to_string(),
            company: "Global Solutions".to_string(),
            email: "michael@globalsolutions.com".to_string(),
            phone: "(555) 456-7890".to_string(),
            notes: Some("Prefers phone calls over email".to_string()),
            created_at: "2023-03-10T11:45:00.000Z".to_string(),
        },
    ]
}

pub fn leads() -> Vec<Lead> {
    vec![
        Lead {
            id: "1".to_string(),
            name: "Enterprise Software Upgrade".to_string(),
            company: "Acme Inc".to_string(),
            status: LeadStatus::Hot,
            contact_id: Some("1".to_string()),
            notes: Some("Budget approved for Q3".to_string()),
            created_at: "2023-04-05T09:00:00.000Z".to_string(),
        },
        Lead {
            id: "2".to_string(),
            name: "Cloud Migration".to_string(),
            company: "TechCorp".to_string(),
            status: LeadStatus::Warm,
            contact_id: Some("2".to_string()),
            notes: None,
            created_at: "2023-04-12T16:20:00.000Z".to_string(),
        },
        Lead {
            id: "3".to_string(),
            name: "Security Audit".to_string(),
            company: "Northwind".to_string(),
            status: LeadStatus::Cold,
            contact_id: None,
            notes: None,
            created_at: "2023-05-01T10:10:00.000Z".to_string(),
        },
    ]
}

pub fn deals() -> Vec<Deal> {
    vec![
        Deal {
            id: "1".to_string(),
            name: "Annual License Renewal".to_string(),
            company: "Acme Inc".to_string(),
            value: "24500".to_string(),
            stage: DealStage::Negotiation,
            contact_id: Some("1".to_string()),
            notes: None,
            created_at: "2023-05-15T13:00:00.000Z".to_string(),
        },
        Deal {
            id: "2".to_string(),
            name: "Data Platform Pilot".to_string(),
            company: "TechCorp".to_string(),
            value: "12000".to_string(),
            stage: DealStage::Proposal,
            contact_id: Some("2".to_string()),
            notes: Some("Pilot scoped to two teams".to_string()),
            created_at: "2023-05-22T09:30:00.000Z".to_string(),
        },
        Deal {
            id: "3".to_string(),
            name: "Support Contract".to_string(),
            company: "Global Solutions".to_string(),
            value: "8000".to_string(),
            stage: DealStage::Contacted,
            contact_id: Some("3".to_string()),
            notes: None,
            created_at: "2023-06-02T15:45:00.000Z".to_string(),
        },
    ]
}

pub fn activities() -> Vec<Activity> {
    vec![
        Activity {
            id: "1".to_string(),
            activity_type: ActivityType::Call,
            notes: "Discussed renewal terms and volume discount".to_string(),
            contact_id: Some("1".to_string()),
            deal_id: Some("1".to_string()),
            created_at: "2023-06-05T10:00:00.000Z".to_string(),
        },
        Activity {
            id: "2".to_string(),
            activity_type: ActivityType::Meeting,
            notes: "Pilot kickoff with engineering leads".to_string(),
            contact_id: Some("2".to_string()),
            deal_id: Some("2".to_string()),
            created_at: "2023-06-07T14:30:00.000Z".to_string(),
        },
        Activity {
            id: "3".to_string(),
            activity_type: ActivityType::Email,
            notes: "Sent support tier comparison".to_string(),
            contact_id: Some("3".to_string()),
            deal_id: None,
            created_at: "2023-06-08T09:15:00.000Z".to_string(),
        },
        Activity {
            id: "4".to_string(),
            activity_type: ActivityType::Note,
            notes: "Procurement asked for updated W-9".to_string(),
            contact_id: Some("1".to_string()),
            deal_id: None,
            created_at: "2023-06-09T17:05:00.000Z".to_string(),
        },
    ]
}
