//! Azure DNS wire types and conversions

use serde::{Deserialize, Serialize};

use crate::providers::common::split_txt_value;
use crate::types::{CreateRecordSetRequest, DnsZone, RecordData, RecordSet, RecordType};

/// ARM error envelope (`{"error": {"code", "message"}}`).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AzureErrorBody {
    #[serde(default)]
    pub error: Option<AzureErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AzureErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AzureZone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: Option<AzureZoneProperties>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AzureZoneProperties {
    #[serde(rename = "nameServers", default)]
    pub name_servers: Vec<String>,
}

impl From<AzureZone> for DnsZone {
    fn from(zone: AzureZone) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
            name_servers: zone.properties.map(|p| p.name_servers).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AzureRecordSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub properties: AzureRecordSetProperties,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct AzureRecordSetProperties {
    #[serde(rename = "TTL", default)]
    pub ttl: u32,
    #[serde(skip_serializing)]
    pub fqdn: Option<String>,
    #[serde(rename = "ARecords", skip_serializing_if = "Option::is_none")]
    pub a_records: Option<Vec<ARecord>>,
    #[serde(rename = "AAAARecords", skip_serializing_if = "Option::is_none")]
    pub aaaa_records: Option<Vec<AaaaRecord>>,
    #[serde(rename = "CNAMERecord", skip_serializing_if = "Option::is_none")]
    pub cname_record: Option<CnameRecord>,
    #[serde(rename = "MXRecords", skip_serializing_if = "Option::is_none")]
    pub mx_records: Option<Vec<MxRecord>>,
    #[serde(rename = "TXTRecords", skip_serializing_if = "Option::is_none")]
    pub txt_records: Option<Vec<TxtRecord>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ARecord {
    #[serde(rename = "ipv4Address")]
    pub ipv4_address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AaaaRecord {
    #[serde(rename = "ipv6Address")]
    pub ipv6_address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CnameRecord {
    pub cname: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TxtRecord {
    pub value: Vec<String>,
}

/// ARM path segment for a record type.
pub(crate) fn record_type_segment(record_type: RecordType) -> &'static str {
    record_type.as_str()
}

impl AzureRecordSet {
    /// Request body for creating a set holding `req.data`.
    pub fn from_request(req: &CreateRecordSetRequest) -> Self {
        let mut properties = AzureRecordSetProperties {
            ttl: req.ttl,
            ..Default::default()
        };

        match &req.data {
            RecordData::A { address } => {
                properties.a_records = Some(vec![ARecord {
                    ipv4_address: address.clone(),
                }]);
            }
            RecordData::AAAA { address } => {
                properties.aaaa_records = Some(vec![AaaaRecord {
                    ipv6_address: address.clone(),
                }]);
            }
            RecordData::CNAME { target } => {
                properties.cname_record = Some(CnameRecord {
                    cname: target.clone(),
                });
            }
            RecordData::MX {
                preference,
                exchange,
            } => {
                properties.mx_records = Some(vec![MxRecord {
                    preference: *preference,
                    exchange: exchange.clone(),
                }]);
            }
            RecordData::TXT { values } => {
                properties.txt_records = Some(vec![TxtRecord {
                    value: values.iter().flat_map(|v| split_txt_value(v)).collect(),
                }]);
            }
        }

        Self {
            id: None,
            name: None,
            properties,
        }
    }

    /// Convert a response into the shared model, keeping only values of `record_type`.
    pub fn into_record_set(self, record_type: RecordType, fallback_name: &str) -> RecordSet {
        let props = self.properties;

        let records = match record_type {
            RecordType::A => props
                .a_records
                .unwrap_or_default()
                .into_iter()
                .map(|r| RecordData::A {
                    address: r.ipv4_address,
                })
                .collect(),
            RecordType::Aaaa => props
                .aaaa_records
                .unwrap_or_default()
                .into_iter()
                .map(|r| RecordData::AAAA {
                    address: r.ipv6_address,
                })
                .collect(),
            RecordType::Cname => props
                .cname_record
                .into_iter()
                .map(|r| RecordData::CNAME { target: r.cname })
                .collect(),
            RecordType::Mx => props
                .mx_records
                .unwrap_or_default()
                .into_iter()
                .map(|r| RecordData::MX {
                    preference: r.preference,
                    exchange: r.exchange,
                })
                .collect(),
            RecordType::Txt => props
                .txt_records
                .unwrap_or_default()
                .into_iter()
                .map(|r| RecordData::TXT { values: r.value })
                .collect(),
        };

        RecordSet {
            id: self.id,
            name: self.name.unwrap_or_else(|| fallback_name.to_string()),
            fqdn: props.fqdn.map(|f| f.trim_end_matches('.').to_string()),
            record_type,
            ttl: props.ttl,
            records,
        }
    }
}
