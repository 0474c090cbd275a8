//! Built-in ABIs for well-known contracts
//!
//! These let the analyzer decode common actions without the contract's ABI
//! being installed in the same transaction.

use log::debug;
use once_cell::sync::Lazy;

use crate::models::abi::Abi;
use crate::models::name::Name;
use crate::models::system::{EOSIO, SETABI, SETCODE};

pub const EOSIO_TOKEN: Name = Name::from_literal("eosio.token");
pub const EOSIO_MSIG: Name = Name::from_literal("eosio.msig");
pub const EOSIO_FORUM: Name = Name::from_literal("eosio.forum");

const ABI_VERSION: &str = "eosio::abi/1.1";

static SYSTEM_ABI: Lazy<Abi> = Lazy::new(build_system_abi);
static TOKEN_ABI: Lazy<Abi> = Lazy::new(build_token_abi);
static MSIG_ABI: Lazy<Abi> = Lazy::new(build_msig_abi);
static FORUM_ABI: Lazy<Abi> = Lazy::new(build_forum_abi);

/// Built-in ABI for `account`, if it is a well-known contract
pub fn builtin_abi(account: Name) -> Option<&'static Abi> {
    let abi: &'static Abi = match account {
        EOSIO => &SYSTEM_ABI,
        EOSIO_TOKEN => &TOKEN_ABI,
        EOSIO_MSIG => &MSIG_ABI,
        EOSIO_FORUM => &FORUM_ABI,
        _ => return None,
    };
    debug!("Using built-in ABI for {}", account);
    Some(abi)
}

/// ABI of the system contract, restricted to account and resource management
pub fn system_abi() -> &'static Abi {
    &SYSTEM_ABI
}

fn build_system_abi() -> Abi {
    let mut abi = Abi::new(ABI_VERSION);

    abi.add_struct("permission_level", "", &[("actor", "name"), ("permission", "name")]);
    abi.add_struct("key_weight", "", &[("key", "public_key"), ("weight", "uint16")]);
    abi.add_struct(
        "permission_level_weight",
        "",
        &[("permission", "permission_level"), ("weight", "uint16")],
    );
    abi.add_struct("wait_weight", "", &[("wait_sec", "uint32"), ("weight", "uint16")]);
    abi.add_struct(
        "authority",
        "",
        &[
            ("threshold", "uint32"),
            ("keys", "key_weight[]"),
            ("accounts", "permission_level_weight[]"),
            ("waits", "wait_weight[]"),
        ],
    );

    abi.add_struct(
        "setcode",
        "",
        &[("account", "name"), ("vmtype", "uint8"), ("vmversion", "uint8"), ("code", "bytes")],
    );
    abi.add_struct("setabi", "", &[("account", "name"), ("abi", "bytes")]);
    abi.add_struct(
        "newaccount",
        "",
        &[("creator", "name"), ("name", "name"), ("owner", "authority"), ("active", "authority")],
    );
    abi.add_struct(
        "updateauth",
        "",
        &[("account", "name"), ("permission", "name"), ("parent", "name"), ("auth", "authority")],
    );
    abi.add_struct("deleteauth", "", &[("account", "name"), ("permission", "name")]);
    abi.add_struct(
        "linkauth",
        "",
        &[("account", "name"), ("code", "name"), ("type", "name"), ("requirement", "name")],
    );
    abi.add_struct("unlinkauth", "", &[("account", "name"), ("code", "name"), ("type", "name")]);
    abi.add_struct("buyram", "", &[("payer", "name"), ("receiver", "name"), ("quant", "asset")]);
    abi.add_struct("buyrambytes", "", &[("payer", "name"), ("receiver", "name"), ("bytes", "uint32")]);
    abi.add_struct("sellram", "", &[("account", "name"), ("bytes", "int64")]);
    abi.add_struct(
        "delegatebw",
        "",
        &[
            ("from", "name"),
            ("receiver", "name"),
            ("stake_net_quantity", "asset"),
            ("stake_cpu_quantity", "asset"),
            ("transfer", "bool"),
        ],
    );
    abi.add_struct(
        "undelegatebw",
        "",
        &[
            ("from", "name"),
            ("receiver", "name"),
            ("unstake_net_quantity", "asset"),
            ("unstake_cpu_quantity", "asset"),
        ],
    );
    abi.add_struct("voteproducer", "", &[("voter", "name"), ("proxy", "name"), ("producers", "name[]")]);
    abi.add_struct(
        "regproducer",
        "",
        &[
            ("producer", "name"),
            ("producer_key", "public_key"),
            ("url", "string"),
            ("location", "uint16"),
        ],
    );
    abi.add_struct("unregprod", "", &[("producer", "name")]);
    abi.add_struct("claimrewards", "", &[("owner", "name")]);
    abi.add_struct("refund", "", &[("owner", "name")]);
    abi.add_struct("bidname", "", &[("bidder", "name"), ("newname", "name"), ("bid", "asset")]);
    abi.add_struct("regproxy", "", &[("proxy", "name"), ("isproxy", "bool")]);
    abi.add_struct("setpriv", "", &[("account", "name"), ("is_priv", "uint8")]);
    abi.add_struct(
        "canceldelay",
        "",
        &[("canceling_auth", "permission_level"), ("trx_id", "checksum256")],
    );

    abi.add_action(SETCODE, "setcode");
    abi.add_action(SETABI, "setabi");
    for action in [
        "newaccount",
        "updateauth",
        "deleteauth",
        "linkauth",
        "unlinkauth",
        "buyram",
        "buyrambytes",
        "sellram",
        "delegatebw",
        "undelegatebw",
        "voteproducer",
        "regproducer",
        "unregprod",
        "claimrewards",
        "refund",
        "bidname",
        "regproxy",
        "setpriv",
        "canceldelay",
    ] {
        add_named_action(&mut abi, action);
    }
    abi
}

fn build_token_abi() -> Abi {
    let mut abi = Abi::new(ABI_VERSION);
    abi.add_struct("create", "", &[("issuer", "name"), ("maximum_supply", "asset")]);
    abi.add_struct("issue", "", &[("to", "name"), ("quantity", "asset"), ("memo", "string")]);
    abi.add_struct("retire", "", &[("quantity", "asset"), ("memo", "string")]);
    abi.add_struct(
        "transfer",
        "",
        &[("from", "name"), ("to", "name"), ("quantity", "asset"), ("memo", "string")],
    );
    abi.add_struct("open", "", &[("owner", "name"), ("symbol", "symbol"), ("ram_payer", "name")]);
    abi.add_struct("close", "", &[("owner", "name"), ("symbol", "symbol")]);
    for action in ["create", "issue", "retire", "transfer", "open", "close"] {
        add_named_action(&mut abi, action);
    }
    abi
}

/// Structs describing a whole transaction, for payloads that embed one
fn add_transaction_structs(abi: &mut Abi) {
    abi.add_struct("permission_level", "", &[("actor", "name"), ("permission", "name")]);
    abi.add_struct(
        "action",
        "",
        &[
            ("account", "name"),
            ("name", "name"),
            ("authorization", "permission_level[]"),
            ("data", "bytes"),
        ],
    );
    abi.add_struct("extension", "", &[("type", "uint16"), ("data", "bytes")]);
    abi.add_struct(
        "transaction_header",
        "",
        &[
            ("expiration", "time_point_sec"),
            ("ref_block_num", "uint16"),
            ("ref_block_prefix", "uint32"),
            ("max_net_usage_words", "varuint32"),
            ("max_cpu_usage_ms", "uint8"),
            ("delay_sec", "varuint32"),
        ],
    );
    abi.add_struct(
        "transaction",
        "transaction_header",
        &[
            ("context_free_actions", "action[]"),
            ("actions", "action[]"),
            ("transaction_extensions", "extension[]"),
        ],
    );
}

fn build_msig_abi() -> Abi {
    let mut abi = Abi::new(ABI_VERSION);
    add_transaction_structs(&mut abi);
    abi.add_struct(
        "propose",
        "",
        &[
            ("proposer", "name"),
            ("proposal_name", "name"),
            ("requested", "permission_level[]"),
            ("trx", "transaction"),
        ],
    );
    abi.add_struct(
        "approve",
        "",
        &[("proposer", "name"), ("proposal_name", "name"), ("level", "permission_level")],
    );
    abi.add_struct(
        "unapprove",
        "",
        &[("proposer", "name"), ("proposal_name", "name"), ("level", "permission_level")],
    );
    abi.add_struct("cancel", "", &[("proposer", "name"), ("proposal_name", "name"), ("canceler", "name")]);
    abi.add_struct("exec", "", &[("proposer", "name"), ("proposal_name", "name"), ("executer", "name")]);
    for action in ["propose", "approve", "unapprove", "cancel", "exec"] {
        add_named_action(&mut abi, action);
    }
    abi
}

fn build_forum_abi() -> Abi {
    let mut abi = Abi::new(ABI_VERSION);
    abi.add_struct(
        "post",
        "",
        &[
            ("poster", "name"),
            ("post_uuid", "string"),
            ("content", "string"),
            ("reply_to_poster", "name"),
            ("reply_to_post_uuid", "string"),
            ("certify", "bool"),
            ("json_metadata", "string"),
        ],
    );
    abi.add_struct("unpost", "", &[("poster", "name"), ("post_uuid", "string")]);
    abi.add_struct(
        "propose",
        "",
        &[
            ("proposer", "name"),
            ("proposal_name", "name"),
            ("title", "string"),
            ("proposal_json", "string"),
            ("expires_at", "time_point_sec"),
        ],
    );
    abi.add_struct("expire", "", &[("proposal_name", "name")]);
    abi.add_struct(
        "vote",
        "",
        &[
            ("voter", "name"),
            ("proposal_name", "name"),
            ("vote", "uint8"),
            ("vote_json", "string"),
        ],
    );
    abi.add_struct("unvote", "", &[("voter", "name"), ("proposal_name", "name")]);
    abi.add_struct("status", "", &[("account", "name"), ("content", "string")]);
    for action in ["post", "unpost", "propose", "expire", "vote", "unvote", "status"] {
        add_named_action(&mut abi, action);
    }
    abi
}

/// Bind an action to the struct of the same name
fn add_named_action(abi: &mut Abi, action: &str) {
    match action.parse::<Name>() {
        Ok(name) => abi.add_action(name, action),
        Err(e) => debug!("Skipping built-in action: {}", e),
    }
}
