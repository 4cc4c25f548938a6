use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CloudService {
    #[serde(rename = "EC2")]
    Ec2,
    S3,
    #[serde(rename = "DynamoDB")]
    DynamoDb,
    Lambda,
    CloudWatch,
}

impl CloudService {
    /// Services reported on, in response order.
    pub const ALL: [CloudService; 5] = [
        CloudService::Ec2,
        CloudService::S3,
        CloudService::DynamoDb,
        CloudService::Lambda,
        CloudService::CloudWatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ec2 => "EC2",
            Self::S3 => "S3",
            Self::DynamoDb => "DynamoDB",
            Self::Lambda => "Lambda",
            Self::CloudWatch => "CloudWatch",
        }
    }
}

impl fmt::Display for CloudService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 3] = [
        HealthStatus::Healthy,
        HealthStatus::Degraded,
        HealthStatus::Down,
    ];
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Down => write!(f, "Down"),
        }
    }
}

// Uniform over the three statuses.
impl Distribution<HealthStatus> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> HealthStatus {
        HealthStatus::ALL[rng.gen_range(0..HealthStatus::ALL.len())]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceHealthEntry {
    pub name: CloudService,
    pub status: HealthStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthSnapshot {
    pub services: Vec<ServiceHealthEntry>,
}

impl HealthSnapshot {
    /// Draws a fresh snapshot from the thread-local RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        let services = CloudService::ALL
            .iter()
            .map(|&name| ServiceHealthEntry {
                name,
                status: rng.gen(),
            })
            .collect();

        Self { services }
    }
}
