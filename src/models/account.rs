use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Scalar;

/// Directory record for an account, from `GET /v5/accounts/{accountId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMap {
    pub account_code: String,
    pub company_id: Scalar,
    pub partitions: Vec<PartitionMap>,
}

/// A partition of the account's access-control installation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionMap {
    pub id: Scalar,
    /// Partition index on the device, usually sent as a numeric string
    pub number: Scalar,
}

impl AccountMap {
    /// First partition whose id matches in both type and value, in list order.
    /// A numeric id never matches a string `partitionId` and vice versa.
    pub fn find_partition(&self, partition_id: &Value) -> Option<&PartitionMap> {
        self.partitions
            .iter()
            .find(|partition| partition.id.same_as(partition_id))
    }
}
