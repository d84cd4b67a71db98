//! Pod descriptor model
//!
//! A typed subset of the Kubernetes `v1/Pod` schema, enough to describe the
//! single bootstrap etcd member. Field order follows the order the kubelet's
//! own manifests use, so the rendered YAML reads like a hand-written one.

use serde::{Deserialize, Serialize};

/// Name of the bootstrap pod and of the etcd member it runs
pub const BOOT_ETCD_NAME: &str = "boot-etcd";

/// Namespace the bootstrap pod is created in
pub const BOOT_ETCD_NAMESPACE: &str = "kube-system";

/// Container image running the bootstrap member
pub const ETCD_IMAGE: &str = "quay.io/coreos/etcd:v3.1.0-alpha.1";

/// Port etcd serves clients on
pub const ETCD_CLIENT_PORT: u16 = 2379;

/// Port etcd talks to peers on
pub const ETCD_PEER_PORT: u16 = 2380;

/// Environment variable the kubelet fills with the pod's IP
pub const POD_IP_ENV: &str = "MY_POD_IP";

const ETCD_BINARY: &str = "/usr/local/bin/etcd";
const ETCD_DATA_DIR: &str = "/var/etcd/data";
const INITIAL_CLUSTER_TOKEN: &str = "bootkube";

/// A Pod document as consumed by the kubelet's static pod source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: PodSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    pub containers: Vec<Container>,
    pub dns_policy: DnsPolicy,
    /// Share the host's network namespace
    pub host_network: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DnsPolicy {
    ClusterFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    pub image: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ContainerPort>,
}

/// An environment binding, either literal or resolved by the kubelet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<EnvVarSource>,
}

impl EnvVar {
    /// Binding resolved from a field of the running pod (e.g. `status.podIP`)
    pub fn from_field(name: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            value_from: Some(EnvVarSource {
                field_ref: ObjectFieldSelector {
                    field_path: field_path.into(),
                },
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVarSource {
    pub field_ref: ObjectFieldSelector,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFieldSelector {
    pub field_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    pub container_port: u16,
    pub host_port: u16,
    pub name: String,
    pub protocol: Protocol,
}

impl ContainerPort {
    /// A TCP port published on the same number on the host
    pub fn tcp(port: u16, name: impl Into<String>) -> Self {
        Self {
            container_port: port,
            host_port: port,
            name: name.into(),
            protocol: Protocol::Tcp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
}

impl Pod {
    /// The bootstrap etcd pod
    ///
    /// A single-member cluster named `boot-etcd`, listening on all interfaces
    /// of the host network and advertising the pod IP the kubelet injects as
    /// `MY_POD_IP`.
    pub fn boot_etcd() -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "Pod".to_string(),
            metadata: ObjectMeta {
                name: BOOT_ETCD_NAME.to_string(),
                namespace: BOOT_ETCD_NAMESPACE.to_string(),
            },
            spec: PodSpec {
                containers: vec![Container {
                    command: vec![
                        "/bin/sh".to_string(),
                        "-c".to_string(),
                        etcd_invocation(),
                    ],
                    env: vec![EnvVar::from_field(POD_IP_ENV, "status.podIP")],
                    image: ETCD_IMAGE.to_string(),
                    name: "etcd".to_string(),
                    ports: vec![
                        ContainerPort::tcp(ETCD_PEER_PORT, "serverport"),
                        ContainerPort::tcp(ETCD_CLIENT_PORT, "clientport"),
                    ],
                }],
                dns_policy: DnsPolicy::ClusterFirst,
                host_network: true,
            },
        }
    }

    /// Host port published under the given port name, if any container declares it
    pub fn host_port(&self, name: &str) -> Option<u16> {
        self.spec
            .containers
            .iter()
            .flat_map(|c| c.ports.iter())
            .find(|p| p.name == name)
            .map(|p| p.host_port)
    }

    /// Renders the pod as a YAML document
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Shell command line starting the bootstrap member
///
/// `$(MY_POD_IP)` is expanded by the kubelet before the shell runs.
fn etcd_invocation() -> String {
    let pod_ip = format!("$({})", POD_IP_ENV);
    let peer_url = format!("http://{}:{}", pod_ip, ETCD_PEER_PORT);

    [
        ETCD_BINARY.to_string(),
        format!("--name {}", BOOT_ETCD_NAME),
        format!("--listen-client-urls=http://0.0.0.0:{}", ETCD_CLIENT_PORT),
        format!("--listen-peer-urls=http://0.0.0.0:{}", ETCD_PEER_PORT),
        format!("--advertise-client-urls=http://{}:{}", pod_ip, ETCD_CLIENT_PORT),
        format!("--initial-advertise-peer-urls {}", peer_url),
        format!("--initial-cluster {}={}", BOOT_ETCD_NAME, peer_url),
        format!("--initial-cluster-token {}", INITIAL_CLUSTER_TOKEN),
        "--initial-cluster-state new".to_string(),
        format!("--data-dir={}", ETCD_DATA_DIR),
    ]
    .join(" ")
}
