//! Sample data the engagement store is seeded with at startup.

use chrono::{Duration, Utc};
use tracing::info;

use super::{
    FollowUpChannel, InteractionType, MemStorage, NewClient, NewFollowUp, NewInteraction, NewNote,
};

/// Seed clients, interactions, follow-ups and notes.
///
/// Client ids are assigned in order, so the records below refer to the
/// clients as 1, 2 and 3 when seeding an empty store.
pub fn seed_fixtures(storage: &mut MemStorage) {
    info!("Seeding sample clients...");

    // Format: (name, email, company, lead score, tags)
    let clients: Vec<(&str, &str, &str, i32, Vec<&str>)> = vec![
        (
            "Sarah Johnson",
            "sarah@luxebeauty.com",
            "Luxe Beauty Salon",
            94,
            vec!["VIP", "Active"],
        ),
        (
            "Michael Chen",
            "michael@chenlaw.com",
            "Chen & Associates Law",
            76,
            vec!["Contract Renewal", "Follow-up"],
        ),
        (
            "Emma Rodriguez",
            "emma@strategicconsult.com",
            "Strategic Consulting Group",
            58,
            vec!["Needs Attention", "Inactive"],
        ),
    ];

    let ids: Vec<i32> = clients
        .into_iter()
        .map(|(name, email, company, score, tags)| {
            storage
                .create_client(NewClient {
                    name: name.to_string(),
                    email: email.to_string(),
                    company: Some(company.to_string()),
                    lead_score: Some(score),
                    tags: Some(tags.iter().map(|t| t.to_string()).collect()),
                })
                .id
        })
        .collect();
    let (sarah, michael, emma) = (ids[0], ids[1], ids[2]);

    // Format: (client, type, title, description, duration)
    let interactions = [
        (
            sarah,
            InteractionType::Email,
            "Email sent to Sarah Johnson",
            "Follow-up regarding hair appointment scheduling for next month's color treatment.",
            None,
        ),
        (
            michael,
            InteractionType::Phone,
            "Phone call with Michael Chen",
            "Discussed upcoming contract renewal and additional legal services needed for Q2.",
            Some("25 mins"),
        ),
        (
            emma,
            InteractionType::Meeting,
            "Meeting with Emma Rodriguez",
            "Strategic consultation session to review Q1 performance and plan marketing initiatives.",
            Some("1 hour"),
        ),
    ];
    for (client_id, interaction_type, title, description, duration) in interactions {
        storage.create_interaction(NewInteraction {
            client_id,
            interaction_type,
            title: title.to_string(),
            description: Some(description.to_string()),
            duration: duration.map(String::from),
        });
    }

    let now = Utc::now();
    let follow_ups = [
        (
            sarah,
            FollowUpChannel::Email,
            "Follow-up on hair appointment booking",
            now - Duration::days(1),
        ),
        (michael, FollowUpChannel::Sms, "Contract renewal reminder", now),
        (
            emma,
            FollowUpChannel::Email,
            "Quarterly strategy review meeting reminder",
            now + Duration::days(7),
        ),
    ];
    for (client_id, channel, message, scheduled_date) in follow_ups {
        storage.create_follow_up(NewFollowUp {
            client_id,
            channel,
            message: message.to_string(),
            scheduled_date,
            completed: Some(false),
            reminder: Some(true),
        });
    }

    let notes = [
        (sarah, "Prefers morning appointments. Interested in expanding to a second location. Mentioned budget concerns for new equipment."),
        (sarah, "Excellent response rate to follow-up emails. Provided referrals to two other salon owners in the area."),
        (michael, "Contract expires end of Q2. Interested in expanding services to include IP law consultations. Mentioned potential for long-term partnership."),
        (michael, "Prompt payment history. Always responds to communications within 24 hours. Appreciates detailed documentation."),
        (emma, "Has not responded to last three follow-up attempts. Consider alternative communication methods or re-qualification."),
        (emma, "Previously very engaged and responsive. Last meaningful interaction was two months ago regarding marketing strategy."),
    ];
    for (client_id, content) in notes {
        storage.create_note(NewNote {
            client_id,
            content: content.to_string(),
        });
    }

    info!(
        clients = storage.get_all_clients().len(),
        interactions = storage.get_all_interactions().len(),
        follow_ups = storage.get_all_follow_ups().len(),
        "Sample data seeded"
    );
}
