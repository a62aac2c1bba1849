//! Representative managed-entity catalog.
//!
//! A subset of the G.988 classes, enough for ONU bring-up (equipment
//! discovery, T-CONT and GEM port provisioning, bridging, VLAN handling).
//! Attribute order, widths and access rights follow G.988 as deployed ONUs
//! implement it; defaults are what Create sends for set-by-create attributes
//! the caller leaves out.

use super::attribute::{Access, Attribute, AttributeKind as K, MANAGED_ENTITY_ID};
use super::class::EntityClass;

/// Null managed-entity pointer.
pub const NULL_POINTER: u64 = 0xffff;

const fn attr(name: &'static str, kind: K, access: Access) -> Attribute {
    Attribute::new(name, kind, access)
}

pub const ONT_DATA: EntityClass = EntityClass::new(
    2,
    "OntData",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R),
        attr("mib_data_sync", K::Byte, Access::RW),
    ],
);

pub const CARDHOLDER: EntityClass = EntityClass::new(
    5,
    "Cardholder",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R),
        attr("actual_plugin_unit_type", K::Byte, Access::R),
        attr("expected_plugin_unit_type", K::Byte, Access::RW),
        attr("expected_port_count", K::Byte, Access::RW),
        attr("expected_equipment_id", K::String(20), Access::RW),
        attr("actual_equipment_id", K::String(20), Access::R),
        attr("protection_profile_pointer", K::Byte, Access::R),
        attr("invoke_protection_switch", K::Byte, Access::RW),
        attr("arc", K::Byte, Access::RW),
        attr("arc_interval", K::Byte, Access::RW),
    ],
);

pub const CIRCUIT_PACK: EntityClass = EntityClass::new(
    6,
    "CircuitPack",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R_SBC),
        attr("type", K::Byte, Access::R_SBC),
        attr("number_of_ports", K::Byte, Access::R),
        attr("serial_number", K::Octets(8), Access::R),
        attr("version", K::String(14), Access::R),
        attr("vendor_id", K::String(4), Access::R),
        attr("administrative_state", K::Byte, Access::RW),
        attr("operational_state", K::Byte, Access::R),
        attr("bridged_or_ip_ind", K::Byte, Access::RW),
        attr("equipment_id", K::String(20), Access::R),
        attr("card_configuration", K::Byte, Access::RW_SBC),
        attr("total_tcont_buffer_number", K::Byte, Access::R),
        attr("total_priority_queue_number", K::Byte, Access::R),
        attr("total_traffic_scheduler_number", K::Byte, Access::R),
        attr("power_sched_override", K::Int, Access::RW),
    ],
);

pub const MAC_BRIDGE_SERVICE_PROFILE: EntityClass = EntityClass::new(
    45,
    "MacBridgeServiceProfile",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R_SBC),
        attr("spanning_tree_ind", K::Byte, Access::RW_SBC),
        attr("learning_ind", K::Byte, Access::RW_SBC),
        attr("port_bridging_ind", K::Byte, Access::RW_SBC).with_default(0),
        attr("priority", K::Short, Access::RW_SBC),
        attr("max_age", K::Short, Access::RW_SBC),
        attr("hello_time", K::Short, Access::RW_SBC),
        attr("forward_delay", K::Short, Access::RW_SBC),
        attr("unknown_mac_address_discard", K::Byte, Access::RW_SBC),
        attr("mac_learning_depth", K::Byte, Access::RW_SBC).with_default(0),
        attr("dynamic_filtering_ageing_time", K::Int, Access::RW_SBC).with_default(0),
    ],
);

pub const MAC_BRIDGE_PORT_CONFIGURATION_DATA: EntityClass = EntityClass::new(
    47,
    "MacBridgePortConfigurationData",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R_SBC),
        attr("bridge_id_pointer", K::Short, Access::RW_SBC),
        attr("port_num", K::Byte, Access::RW_SBC),
        attr("tp_type", K::Byte, Access::RW_SBC),
        attr("tp_pointer", K::Short, Access::RW_SBC),
        attr("port_priority", K::Short, Access::RW_SBC).with_default(0),
        attr("port_path_cost", K::Short, Access::RW_SBC).with_default(0),
        attr("port_spanning_tree_ind", K::Byte, Access::RW_SBC).with_default(0),
        attr("encapsulation_methods", K::Byte, Access::RW_SBC).with_default(0),
        attr("lan_fcs_ind", K::Byte, Access::RW_SBC).with_default(0),
        attr("port_mac_address", K::Octets(6), Access::R),
        attr("outbound_td_pointer", K::Short, Access::RW),
        attr("inbound_td_pointer", K::Short, Access::RW),
        attr("mac_learning_depth", K::Byte, Access::RW_SBC).with_default(0),
    ],
);

pub const VLAN_TAGGING_FILTER_DATA: EntityClass = EntityClass::new(
    84,
    "VlanTaggingFilterData",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R_SBC),
        attr("vlan_filter_list", K::ShortArray(12), Access::RW_SBC),
        attr("forward_operation", K::Byte, Access::RW_SBC),
        attr("number_of_entries", K::Byte, Access::RW_SBC),
    ],
);

pub const IEEE_8021P_MAPPER_SERVICE_PROFILE: EntityClass = EntityClass::new(
    130,
    "Ieee8021pMapperServiceProfile",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R_SBC),
        attr("tp_pointer", K::Short, Access::RW_SBC),
        attr("interwork_tp_pointer_for_p_bit_priority_0", K::Short, Access::RW_SBC)
            .with_default(NULL_POINTER),
        attr("interwork_tp_pointer_for_p_bit_priority_1", K::Short, Access::RW_SBC)
            .with_default(NULL_POINTER),
        attr("interwork_tp_pointer_for_p_bit_priority_2", K::Short, Access::RW_SBC)
            .with_default(NULL_POINTER),
        attr("interwork_tp_pointer_for_p_bit_priority_3", K::Short, Access::RW_SBC)
            .with_default(NULL_POINTER),
        attr("interwork_tp_pointer_for_p_bit_priority_4", K::Short, Access::RW_SBC)
            .with_default(NULL_POINTER),
        attr("interwork_tp_pointer_for_p_bit_priority_5", K::Short, Access::RW_SBC)
            .with_default(NULL_POINTER),
        attr("interwork_tp_pointer_for_p_bit_priority_6", K::Short, Access::RW_SBC)
            .with_default(NULL_POINTER),
        attr("interwork_tp_pointer_for_p_bit_priority_7", K::Short, Access::RW_SBC)
            .with_default(NULL_POINTER),
        attr("unmarked_frame_option", K::Byte, Access::RW),
        attr("dscp_to_p_bit_mapping", K::Octets(24), Access::RW),
        attr("default_p_bit_marking", K::Byte, Access::RW),
        attr("tp_type", K::Byte, Access::RW),
    ],
);

pub const EXTENDED_VLAN_TAGGING_OPERATION_CONFIGURATION_DATA: EntityClass = EntityClass::new(
    171,
    "ExtendedVlanTaggingOperationConfigurationData",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R_SBC),
        attr("association_type", K::Byte, Access::RW_SBC),
        attr(
            "received_frame_vlan_tagging_operation_table_max_size",
            K::Short,
            Access::R,
        ),
        attr("input_tpid", K::Short, Access::RW),
        attr("output_tpid", K::Short, Access::RW),
        attr("downstream_mode", K::Byte, Access::RW),
        // One 16-octet tagging rule per Set
        attr(
            "received_frame_vlan_tagging_operation_table",
            K::Octets(16),
            Access::RW,
        ),
        attr("associated_me_pointer", K::Short, Access::RW_SBC),
        attr("dscp_to_p_bit_mapping", K::Octets(24), Access::RW),
    ],
);

pub const ONT_G: EntityClass = EntityClass::new(
    256,
    "OntG",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R),
        attr("vendor_id", K::String(4), Access::R),
        attr("version", K::String(14), Access::R),
        attr("serial_number", K::Octets(8), Access::R),
        attr("traffic_management_options", K::Byte, Access::R),
        attr("deprecated", K::Byte, Access::R),
        attr("battery_backup", K::Byte, Access::RW),
        attr("administrative_state", K::Byte, Access::RW),
        attr("operational_state", K::Byte, Access::R),
        attr("ont_survival_time", K::Byte, Access::R),
        attr("logical_onu_id", K::String(24), Access::R),
        attr("logical_password", K::String(12), Access::R),
        attr("credentials_status", K::Byte, Access::RW),
        attr("extended_tc_layer_options", K::Short, Access::R),
    ],
);

pub const TCONT: EntityClass = EntityClass::new(
    262,
    "Tcont",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R),
        attr("alloc_id", K::Short, Access::RW),
        attr("mode_indicator", K::Byte, Access::R),
        attr("policy", K::Byte, Access::RW),
    ],
);

pub const GEM_INTERWORKING_TP: EntityClass = EntityClass::new(
    266,
    "GemInterworkingTp",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R_SBC),
        attr("gem_port_network_ctp_pointer", K::Short, Access::RW_SBC),
        attr("interworking_option", K::Byte, Access::RW_SBC),
        attr("service_profile_pointer", K::Short, Access::RW_SBC),
        attr("interworking_tp_pointer", K::Short, Access::RW_SBC),
        attr("pptp_counter", K::Byte, Access::R),
        attr("operational_state", K::Byte, Access::R),
        attr("gal_profile_pointer", K::Short, Access::RW_SBC),
        attr("gal_loopback_configuration", K::Byte, Access::RW),
    ],
);

pub const GEM_PORT_NETWORK_CTP: EntityClass = EntityClass::new(
    268,
    "GemPortNetworkCtp",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R_SBC),
        attr("port_id", K::Short, Access::RW_SBC),
        attr("tcont_pointer", K::Short, Access::RW_SBC),
        attr("direction", K::Byte, Access::RW_SBC),
        attr("traffic_management_pointer_upstream", K::Short, Access::RW_SBC),
        attr("traffic_descriptor_profile_pointer", K::Short, Access::RW_SBC).with_default(0),
        attr("uni_counter", K::Byte, Access::R),
        attr("priority_queue_pointer_downstream", K::Short, Access::RW_SBC).with_default(0),
        attr("encryption_state", K::Byte, Access::R),
        attr("traffic_desc_profile_pointer_downstream", K::Short, Access::RW_SBC).with_default(0),
        attr("encryption_key_ring", K::Byte, Access::RW_SBC).with_default(0),
    ],
);

pub const GAL_ETHERNET_PROFILE: EntityClass = EntityClass::new(
    272,
    "GalEthernetProfile",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R_SBC),
        attr("max_gem_payload_size", K::Short, Access::RW_SBC),
    ],
);

pub const MULTICAST_GEM_INTERWORKING_TP: EntityClass = EntityClass::new(
    281,
    "MulticastGemInterworkingTp",
    &[
        attr(MANAGED_ENTITY_ID, K::Short, Access::R_SBC),
        attr("gem_port_network_ctp_pointer", K::Short, Access::RW_SBC),
        attr("interworking_option", K::Byte, Access::RW_SBC),
        attr("service_profile_pointer", K::Short, Access::RW_SBC),
        attr("interworking_tp_pointer", K::Short, Access::RW_SBC).with_default(0),
        attr("pptp_counter", K::Byte, Access::R),
        attr("operational_state", K::Byte, Access::R),
        attr("gal_profile_pointer", K::Short, Access::RW_SBC).with_default(0),
        attr("gal_loopback_configuration", K::Byte, Access::RW_SBC).with_default(0),
    ],
);

/// Every class in this catalog, in class-id order.
pub const ENTITY_CLASSES: &[EntityClass] = &[
    ONT_DATA,
    CARDHOLDER,
    CIRCUIT_PACK,
    MAC_BRIDGE_SERVICE_PROFILE,
    MAC_BRIDGE_PORT_CONFIGURATION_DATA,
    VLAN_TAGGING_FILTER_DATA,
    IEEE_8021P_MAPPER_SERVICE_PROFILE,
    EXTENDED_VLAN_TAGGING_OPERATION_CONFIGURATION_DATA,
    ONT_G,
    TCONT,
    GEM_INTERWORKING_TP,
    GEM_PORT_NETWORK_CTP,
    GAL_ETHERNET_PROFILE,
    MULTICAST_GEM_INTERWORKING_TP,
];
