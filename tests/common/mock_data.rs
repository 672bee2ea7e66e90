//! Mock data builders for creating test records without reading from disk.

use opsdeck::types::{Issue, IssueStatus, MergeRequest, MergeStatus, Priority, RecordKind};

/// Builder for creating test issues
pub struct IssueBuilder {
    issue: Issue,
}

impl IssueBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            issue: Issue {
                id: id.to_string(),
                title: format!("Issue {}", id),
                kind: RecordKind::Bug,
                status: IssueStatus::Open,
                repository: "backend/api".to_string(),
                author: "Sarah Chen".to_string(),
                created: "2025-06-01".to_string(),
                updated: "2025-06-02".to_string(),
                assignee: "Eddie Lake".to_string(),
                ai_analyzed: false,
                priority: Priority::Medium,
                labels: Vec::new(),
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.issue.title = title.to_string();
        self
    }

    pub fn status(mut self, status: IssueStatus) -> Self {
        self.issue.status = status;
        self
    }

    pub fn repository(mut self, repository: &str) -> Self {
        self.issue.repository = repository.to_string();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.issue.priority = priority;
        self
    }

    pub fn analyzed(mut self) -> Self {
        self.issue.ai_analyzed = true;
        self
    }

    pub fn build(self) -> Issue {
        self.issue
    }
}

/// `count` issues with ids issue-0..issue-n, alternating status
pub fn mock_issues(count: usize) -> Vec<Issue> {
    (0..count)
        .map(|i| {
            let status = match i % 3 {
                0 => IssueStatus::Open,
                1 => IssueStatus::InProgress,
                _ => IssueStatus::Closed,
            };
            IssueBuilder::new(&format!("issue-{i}"))
                .title(&format!("Task number {i}"))
                .status(status)
                .build()
        })
        .collect()
}

/// A plain merge request with defaults
pub fn mock_merge_request(id: &str) -> MergeRequest {
    MergeRequest {
        id: id.to_string(),
        title: format!("Change {}", id),
        kind: RecordKind::Feature,
        status: MergeStatus::Open,
        repository: "backend/api".to_string(),
        author: "Raj Patel".to_string(),
        created: "2025-06-01".to_string(),
        updated: "2025-06-02".to_string(),
        reviewers: vec!["Sarah Chen".to_string()],
        ai_reviewed: false,
        priority: Priority::Medium,
        branch: format!("change/{}", id),
        source: "github".to_string(),
    }
}

/// `count` merge requests with ids mr-0..mr-n
pub fn mock_merge_requests(count: usize) -> Vec<MergeRequest> {
    (0..count).map(|i| mock_merge_request(&format!("mr-{i}"))).collect()
}
