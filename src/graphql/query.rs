use serde::Serialize;

pub const HISTORY_QUERY: &str = r#"
query History(
  $id: String
  $categories: [ActivityFilterCategory]
  $count: Int
  $offset: Int
  $startDate: Long
  $endDate: Long
  $activityTypeValue: ActivityType
  $performedByUserId: String
  $taskId: ID
) {
  api {
    activities(
      first: $count
      offset: $offset
      contextId: $id
      categories: $categories
      taskId: $taskId
      startDate: $startDate
      endDate: $endDate
      activityType: $activityTypeValue
      performedByUserId: $performedByUserId
    ) {
      edges {
        ...Activity
      }
    }
  }
}

fragment Activity on ActivityEdge {
  node {
    id
    author {
      id
      name
    }
    description
    timestamp
    callId
    cause
    activityType
    mentionedUsers {
      __typename
      id
      firstName
      lastName
      userName
      enabled
    }
  }
}
"#;

/// Variables for one page of the history query. Filters this tool does not
/// use are always sent as explicit nulls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryVariables {
    pub count: u32,
    pub offset: u64,
    pub activity_type_value: Option<String>,
    pub categories: Option<Vec<String>>,
    pub start_date: i64,
    pub end_date: Option<i64>,
    pub id: Option<String>,
    pub task_id: Option<String>,
    pub performed_by_user_id: Option<String>,
}

impl HistoryVariables {
    pub fn page(count: u32, offset: u64, start_date: i64, context_id: Option<&str>) -> Self {
        Self {
            count,
            offset,
            activity_type_value: None,
            categories: None,
            start_date,
            end_date: None,
            id: context_id.map(ToOwned::to_owned),
            task_id: None,
            performed_by_user_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: &'a HistoryVariables,
}
