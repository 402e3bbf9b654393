//! Launch content shown before any user activity.

use chrono::{Duration, Utc};
use medcheck_core::{Comment, CommunityPost, TopicKind, TrendingTopic, new_id};

use crate::AppState;

impl AppState {
    /// A store pre-populated with the launch content: trending topics and a
    /// starter community post.
    pub fn with_seed_data() -> Self {
        let mut state = Self::new();
        state.trending = vec![
            TrendingTopic {
                id: new_id(),
                topic: "Vitamin C & COVID".into(),
                count: 1240,
                kind: TopicKind::Claim,
            },
            TrendingTopic {
                id: new_id(),
                topic: "Retinol".into(),
                count: 850,
                kind: TopicKind::Ingredient,
            },
            TrendingTopic {
                id: new_id(),
                topic: "Apple Cider Vinegar".into(),
                count: 620,
                kind: TopicKind::Ingredient,
            },
        ];
        state.posts = vec![CommunityPost {
            id: new_id(),
            author_id: new_id(),
            author_name: "Alex Rivera".into(),
            is_professional: false,
            content: "I have been using curry leaves in my hair oil for 3 months, and the \
                      shedding has significantly reduced! My grandmother was right."
                .into(),
            likes: 45,
            timestamp: Utc::now() - Duration::minutes(17),
            comments: vec![Comment {
                id: new_id(),
                author_name: "Doctor Sam".into(),
                content: "While anecdotal, curry leaves are rich in antioxidants and \
                          beta-carotene which can support hair health."
                    .into(),
                timestamp: Utc::now(),
            }],
        }];
        state
    }
}
